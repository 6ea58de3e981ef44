//! Batter-points: fantasy points analysis library
//!
//! Derives fantasy points from season batting stats, ranks every statistic by
//! its correlation with the points total, and fits an OLS regression on the
//! strongest candidates.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
