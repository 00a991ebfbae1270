//! geo_accuracy library: coordinate verification via reverse geocoding.
//!
//! Checks that (latitude, longitude) pairs in a tabular dataset genuinely
//! correspond to their claimed city/state/country. Each unchecked record is
//! reverse-geocoded against a Nominatim-compatible service through a
//! rate-limited, retrying worker pool, reconciled against the claimed
//! address with abbreviation- and fuzziness-aware matching, and tagged with
//! one of nine verdicts. The dataset is checkpointed after every batch, so
//! a crash loses at most one in-flight batch and a re-run resumes where the
//! last one stopped.
//!
//! # Example
//!
//! ```no_run
//! use geo_accuracy::{config::Config, run_verification};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: "locations.csv".into(),
//!     output: "tagged_locations.csv".into(),
//!     ..Default::default()
//! };
//!
//! let report = run_verification(config).await?;
//! println!("Processed {} of {} records in {} batches",
//!          report.processed, report.total, report.batches);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call library functions within an async context.

pub mod checkpoint;
pub mod config;
pub mod error_handling;
pub mod geocode;
pub mod initialization;
pub mod models;
pub mod normalize;
pub mod reconcile;
pub mod scheduler;

// Re-export public API
pub use config::Config;
pub use run::run_verification;
pub use scheduler::RunReport;

// Internal run module (wires the pipeline together)
mod run {
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use log::info;

    use crate::checkpoint::{load_dataset, CheckpointWriter};
    use crate::config::Config;
    use crate::error_handling::ProcessingStats;
    use crate::geocode::{NominatimClient, RetryingGeocodeClient};
    use crate::initialization::init_client;
    use crate::scheduler::{BatchScheduler, RunReport};

    /// Runs a verification pass with the provided configuration.
    ///
    /// Loads the dataset, verifies every record still `unchecked`, and
    /// rewrites the output checkpoint after each batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be loaded, the HTTP client
    /// cannot be constructed, or a checkpoint fails to persist. A
    /// checkpoint failure stops the run at that batch; verdicts already
    /// persisted stay persisted.
    pub async fn run_verification(config: Config) -> Result<RunReport> {
        let mut dataset = load_dataset(&config.input)
            .with_context(|| format!("Failed to load dataset from {}", config.input.display()))?;
        info!(
            "Loaded {} records from {}",
            dataset.len(),
            config.input.display()
        );

        let http_client = init_client(&config).context("Failed to initialize HTTP client")?;
        let service = Arc::new(NominatimClient::new(http_client, config.geocoder_url.clone()));
        let client = Arc::new(RetryingGeocodeClient::new(
            service,
            config.max_retries,
            config.request_delay(),
        ));

        let checkpoint = CheckpointWriter::new(&config.output);
        let stats = ProcessingStats::new();
        let scheduler = BatchScheduler::from_config(client, &config);

        let report = scheduler
            .process(&mut dataset, &checkpoint, &stats)
            .await
            .context("Verification run failed")?;

        stats.log_summary();
        Ok(report)
    }
}
