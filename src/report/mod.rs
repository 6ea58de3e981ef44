//! Report module - run summary, regression output and JSON export

pub mod regression_report;
pub mod report_export;
pub mod summary;

pub use regression_report::*;
pub use report_export::*;
pub use summary::*;
