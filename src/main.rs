//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geo_accuracy` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use geo_accuracy::initialization::init_logger_with;
use geo_accuracy::{run_verification, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present (e.g. RUST_LOG).
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_verification(config).await {
        Ok(report) => {
            println!(
                "Verified {} record{} across {} batch{} in {:.1}s ({} total in dataset)",
                report.processed,
                if report.processed == 1 { "" } else { "s" },
                report.batches,
                if report.batches == 1 { "" } else { "es" },
                report.elapsed_seconds,
                report.total
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("geo_accuracy error: {e:#}");
            process::exit(1);
        }
    }
}
