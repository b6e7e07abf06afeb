pub mod delta;
pub mod error;
pub mod metrics;
pub mod report;
pub mod summary;
pub mod thresholds;

pub use error::{Error, Result};
