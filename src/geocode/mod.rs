//! Reverse-geocoding service boundary.
//!
//! [`GeocodingService`] is the seam between the pipeline and the remote
//! provider: one async call from a coordinate pair to an optional structured
//! address. [`NominatimClient`] is the production implementation; tests
//! substitute scripted mocks.

pub mod nominatim;
pub mod retry;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::GeocodedAddress;

pub use nominatim::NominatimClient;
pub use retry::{LookupOutcome, RetryingGeocodeClient};

/// Failures reported by a geocoding service.
///
/// `Timeout` is transient and worth retrying; everything else is treated as
/// permanent and aborts the retry loop for the current record.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The request did not complete within the service deadline.
    #[error("geocoding request timed out")]
    Timeout,

    /// Any other service failure (HTTP error, malformed response, ...).
    #[error("geocoding service error: {0}")]
    Remote(String),
}

impl GeocodeError {
    /// Whether a retry might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GeocodeError::Timeout)
    }
}

/// A remote capability resolving coordinates to addresses.
///
/// `Ok(None)` means the service answered but had no usable address for the
/// coordinates (recorded as `unknown` downstream).
#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Resolves a coordinate pair to a structured address.
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<GeocodedAddress>, GeocodeError>;
}
