//! Configuration constants.
//!
//! Defaults for batching, concurrency, pacing, and the fuzzy-match thresholds
//! used by the reconciler.

use std::time::Duration;

/// Default number of records per batch (one checkpoint per batch).
pub const DEFAULT_BATCH_SIZE: usize = 500;
/// Default worker pool size. Kept small to comply with Nominatim's
/// one-request-per-second usage policy.
pub const DEFAULT_MAX_CONCURRENT: usize = 2;
/// Default pacing delay before each lookup attempt, in seconds.
/// Slightly above Nominatim's 1/sec limit.
pub const DEFAULT_REQUEST_DELAY_SECS: f64 = 1.1;
/// Default number of lookup attempts per record.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default per-record deadline in seconds. A worker that has not produced a
/// verdict within this window is recorded as `timeout`.
pub const DEFAULT_PER_TASK_TIMEOUT_SECS: f64 = 30.0;
/// Default whole-batch deadline in seconds. Bounds total run time when the
/// provider is slow; records still in flight at the deadline are recorded as
/// `timeout` and retried on a future run.
pub const DEFAULT_BATCH_TIMEOUT_SECS: f64 = 600.0;

/// Default reverse-geocoding endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
/// User-Agent sent with every geocoding request. Nominatim requires an
/// identifying agent string.
pub const DEFAULT_USER_AGENT: &str = "geo_accuracy/0.1 (coordinate verification)";
/// HTTP timeout for a single geocoding request.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Retry backoff: waits of 1.5s, 3s, 6s between timed-out attempts.
/// Base of the geometric backoff progression.
pub const RETRY_BACKOFF_BASE: u64 = 2;
/// Multiplier applied to the backoff progression, in milliseconds.
pub const RETRY_BACKOFF_FACTOR_MS: u64 = 750;
/// Cap on a single backoff wait.
pub const RETRY_BACKOFF_MAX_DELAY: Duration = Duration::from_secs(30);

// Fuzzy-match thresholds (0-100 similarity scale). Tuning knobs for the
// reconciler; adjust here, not at call sites.
/// Minimum similarity for two country names to be considered the same.
pub const COUNTRY_FUZZY_THRESHOLD: u32 = 85;
/// Minimum similarity for two state/province names to be considered the same.
pub const STATE_FUZZY_THRESHOLD: u32 = 70;
/// Minimum similarity for two city names to be considered the same.
pub const CITY_FUZZY_THRESHOLD: u32 = 70;
