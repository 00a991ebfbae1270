//! Per-record verification: lookup, then reconciliation.

use log::debug;

use crate::geocode::{LookupOutcome, RetryingGeocodeClient};
use crate::models::{LocationRecord, VerificationStatus};
use crate::reconcile::{reconcile, ExpectedLocation};

/// Resolves one record to its verdict. Transport failures come back from
/// the retrying client pre-labeled; successful lookups go through the
/// reconciler.
pub(crate) async fn verify_record(
    client: &RetryingGeocodeClient,
    record: &LocationRecord,
) -> VerificationStatus {
    match client
        .lookup(&record.id, record.latitude, record.longitude)
        .await
    {
        LookupOutcome::Failed(status) => status,
        LookupOutcome::Address(address) => {
            let expected = ExpectedLocation {
                city: &record.claimed_city,
                state: record.claimed_state.as_deref(),
                country: &record.claimed_country,
            };
            let verdict = reconcile(&expected, &address);
            debug!(
                "[{}] expected ({}, {}, {}) | actual ({}, {}, {}) -> {}",
                record.id,
                record.claimed_city,
                record.claimed_state.as_deref().unwrap_or("-"),
                record.claimed_country,
                address.city_candidate().unwrap_or("-"),
                address.state.as_deref().unwrap_or("-"),
                address.country.as_deref().unwrap_or("-"),
                verdict
            );
            verdict
        }
    }
}
