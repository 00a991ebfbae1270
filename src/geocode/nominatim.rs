//! Nominatim / OpenStreetMap reverse-geocoding client.
//!
//! Calls the `/reverse` endpoint with `addressdetails=1` and deserializes
//! the `address` object. The public instance allows at most one request per
//! second; the caller is responsible for pacing (see the retrying client and
//! the scheduler's pool size).
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::GeocodedAddress;

use super::{GeocodeError, GeocodingService};

/// Reverse-geocoding client for a Nominatim instance.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<GeocodedAddress>,
    // Nominatim reports "Unable to geocode" here instead of an address.
    #[serde(default)]
    error: Option<String>,
}

impl NominatimClient {
    /// Creates a client against `base_url` (e.g. `https://nominatim.openstreetmap.org`).
    ///
    /// The `reqwest::Client` carries the User-Agent and per-request timeout;
    /// see `initialization::init_client`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        NominatimClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn map_transport_error(error: reqwest::Error) -> GeocodeError {
        if error.is_timeout() {
            GeocodeError::Timeout
        } else {
            GeocodeError::Remote(error.to_string())
        }
    }
}

#[async_trait]
impl GeocodingService for NominatimClient {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<GeocodedAddress>, GeocodeError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Remote(format!("HTTP {status}")));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(Self::map_transport_error)?;

        if let Some(reason) = body.error {
            log::debug!("geocoder returned no result: {reason}");
            return Ok(None);
        }

        Ok(body.address.filter(|address| !address.is_empty()))
    }
}
