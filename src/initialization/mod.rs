//! Startup helpers: logger and HTTP client construction.

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;
