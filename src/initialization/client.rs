//! HTTP client initialization.

use crate::config::{Config, HTTP_REQUEST_TIMEOUT};
use crate::error_handling::InitializationError;

/// Builds the HTTP client used for geocoding requests.
///
/// Carries the identifying User-Agent (required by Nominatim's usage
/// policy) and a per-request timeout, so a hung connection surfaces as a
/// transient timeout instead of stalling a worker until its deadline.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(HTTP_REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}
