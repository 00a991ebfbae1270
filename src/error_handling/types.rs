//! Error type definitions.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for checkpoint load/persist.
///
/// A persist failure must halt the run: continuing would compute verdicts
/// the next run cannot see and will redo.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Filesystem-level failure (create, write, rename).
    #[error("checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write failure.
    #[error("checkpoint CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row that does not fit the positional contract.
    #[error("malformed row {row}: {message}")]
    MalformedRow {
        /// 1-based row number in the input file.
        row: usize,
        /// What was wrong with it.
        message: String,
    },
}
