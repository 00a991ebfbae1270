//! Error types and run statistics.

mod stats;
mod types;

pub use stats::ProcessingStats;
pub use types::{InitializationError, PersistenceError};
