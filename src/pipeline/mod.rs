//! Pipeline module - the analysis steps, in run order

pub mod correlation;
pub mod export;
pub mod filter;
pub mod regression;
pub mod schema;
pub mod scoring;
pub mod source;

pub use correlation::*;
pub use export::*;
pub use filter::*;
pub use regression::*;
pub use schema::*;
pub use scoring::*;
pub use source::*;
