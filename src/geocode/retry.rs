//! Retrying wrapper around a geocoding service.
//!
//! Bounded attempts with explicit state (attempt counter + backoff
//! iterator) instead of exception-style unwinding. Timeouts retry; any
//! other failure aborts immediately. Each attempt is preceded by a pacing
//! delay that grows with the attempt number, easing off the remote rate
//! limit exactly when it is struggling.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{RETRY_BACKOFF_BASE, RETRY_BACKOFF_FACTOR_MS, RETRY_BACKOFF_MAX_DELAY};
use crate::models::{GeocodedAddress, VerificationStatus};

use super::GeocodingService;

/// Result of a retried lookup: either a usable address for the reconciler,
/// or a terminal transport verdict for the record.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The service returned an address payload; proceed to reconciliation.
    Address(GeocodedAddress),
    /// No payload will be forthcoming; record this status as-is
    /// (`unknown`, `timeout`, or `error`).
    Failed(VerificationStatus),
}

/// Wraps a [`GeocodingService`] with pacing, bounded retries, and backoff.
pub struct RetryingGeocodeClient {
    service: Arc<dyn GeocodingService>,
    max_retries: u32,
    request_delay: Duration,
}

impl RetryingGeocodeClient {
    /// Creates a retrying client making up to `max_retries` attempts, waiting
    /// `request_delay * (attempt + 1)` before each one.
    pub fn new(
        service: Arc<dyn GeocodingService>,
        max_retries: u32,
        request_delay: Duration,
    ) -> Self {
        RetryingGeocodeClient {
            service,
            max_retries,
            request_delay,
        }
    }

    /// Looks up a coordinate pair, retrying transient failures.
    ///
    /// `id` is only used for log correlation.
    pub async fn lookup(&self, id: &str, latitude: f64, longitude: f64) -> LookupOutcome {
        let mut backoff = ExponentialBackoff::from_millis(RETRY_BACKOFF_BASE)
            .factor(RETRY_BACKOFF_FACTOR_MS)
            .max_delay(RETRY_BACKOFF_MAX_DELAY);

        for attempt in 0..self.max_retries {
            // Pacing before every attempt, growing with each retry.
            let pacing = self.request_delay.mul_f64(f64::from(attempt + 1));
            if !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }

            match self.service.reverse_geocode(latitude, longitude).await {
                Ok(Some(address)) => return LookupOutcome::Address(address),
                Ok(None) => {
                    debug!("[{id}] no address for ({latitude}, {longitude})");
                    return LookupOutcome::Failed(VerificationStatus::Unknown);
                }
                Err(error) if error.is_transient() => {
                    warn!(
                        "[{id}] timeout on attempt {} of {}",
                        attempt + 1,
                        self.max_retries
                    );
                    if attempt + 1 == self.max_retries {
                        return LookupOutcome::Failed(VerificationStatus::Timeout);
                    }
                    if let Some(wait) = backoff.next() {
                        tokio::time::sleep(wait).await;
                    }
                }
                Err(error) => {
                    // Permanent failure: remaining attempts would waste rate
                    // budget on the same answer.
                    warn!("[{id}] lookup failed: {error}");
                    return LookupOutcome::Failed(VerificationStatus::Error);
                }
            }
        }

        LookupOutcome::Failed(VerificationStatus::Unknown)
    }
}
