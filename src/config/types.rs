//! Configuration types and CLI options.
//!
//! This module defines the `Config` struct used both for command-line
//! argument parsing and for programmatic construction of the library.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_BATCH_TIMEOUT_SECS, DEFAULT_GEOCODER_URL, DEFAULT_MAX_CONCURRENT,
    DEFAULT_MAX_RETRIES, DEFAULT_PER_TASK_TIMEOUT_SECS, DEFAULT_REQUEST_DELAY_SECS,
    DEFAULT_USER_AGENT,
};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Pipeline configuration.
///
/// Doubles as the CLI surface (via `clap::Parser`) and the library
/// configuration struct. Defaults mirror a polite Nominatim client:
/// a pool of two workers pacing themselves a little over one second apart.
///
/// # Examples
///
/// ```no_run
/// use geo_accuracy::config::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: PathBuf::from("locations.csv"),
///     output: PathBuf::from("tagged_locations.csv"),
///     batch_size: 250,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geo_accuracy",
    about = "Verifies that coordinate pairs match their claimed city/state/country via reverse geocoding"
)]
pub struct Config {
    /// Input CSV with positional fields: id, city, city_alt, country, latitude, longitude, state
    pub input: PathBuf,

    /// Output CSV path; rewritten in full after every batch
    #[arg(short, long, default_value = "tagged_locations.csv")]
    pub output: PathBuf,

    /// Records per batch (one checkpoint per batch)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Maximum concurrent geocoding lookups
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT)]
    pub max_concurrent: usize,

    /// Pacing delay before each lookup attempt, in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_SECS)]
    pub request_delay_secs: f64,

    /// Lookup attempts per record before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Per-record deadline in seconds
    #[arg(long, default_value_t = DEFAULT_PER_TASK_TIMEOUT_SECS)]
    pub per_task_timeout_secs: f64,

    /// Whole-batch deadline in seconds
    #[arg(long, default_value_t = DEFAULT_BATCH_TIMEOUT_SECS)]
    pub batch_timeout_secs: f64,

    /// Reverse-geocoding service base URL
    #[arg(long, default_value = DEFAULT_GEOCODER_URL)]
    pub geocoder_url: String,

    /// User-Agent header for geocoding requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Config {
    /// Pacing delay as a `Duration`.
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_secs)
    }

    /// Per-record deadline as a `Duration`.
    pub fn per_task_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.per_task_timeout_secs)
    }

    /// Whole-batch deadline as a `Duration`.
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.batch_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("locations.csv"),
            output: PathBuf::from("tagged_locations.csv"),
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_delay_secs: DEFAULT_REQUEST_DELAY_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            per_task_timeout_secs: DEFAULT_PER_TASK_TIMEOUT_SECS,
            batch_timeout_secs: DEFAULT_BATCH_TIMEOUT_SECS,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
