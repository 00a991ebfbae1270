//! Scheduler behavior tests: verdict application, deadlines, checkpoints,
//! idempotent re-runs. Uses a scripted geocoding service keyed by latitude
//! and tokio's paused clock, so timeout paths run instantly.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::checkpoint::{load_dataset, CheckpointWriter};
use crate::geocode::{GeocodeError, GeocodingService};
use crate::models::{GeocodedAddress, LocationRecord};

enum Behavior {
    /// Address agreeing with the claimed Springfield/IL/US triple.
    Match,
    /// Address in a different country.
    WrongCountry,
    /// Successful call, empty payload.
    Empty,
    /// Service-side timeout on every attempt.
    AlwaysTimeout,
    /// Permanent remote failure.
    Fail,
    /// Answers correctly, but only after the given delay.
    Slow(Duration),
    /// Never answers.
    Hang,
}

struct MockService {
    behaviors: Vec<Behavior>,
    calls: AtomicUsize,
}

impl MockService {
    fn new(behaviors: Vec<Behavior>) -> Arc<Self> {
        Arc::new(MockService {
            behaviors,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl GeocodingService for MockService {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        _longitude: f64,
    ) -> Result<Option<GeocodedAddress>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviors[latitude as usize] {
            Behavior::Match => Ok(Some(springfield())),
            Behavior::WrongCountry => Ok(Some(paris())),
            Behavior::Empty => Ok(None),
            Behavior::AlwaysTimeout => Err(GeocodeError::Timeout),
            Behavior::Fail => Err(GeocodeError::Remote("HTTP 500".to_string())),
            Behavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Some(springfield()))
            }
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(1_000_000)).await;
                Ok(None)
            }
        }
    }
}

fn springfield() -> GeocodedAddress {
    GeocodedAddress {
        city: Some("Springfield".to_string()),
        state: Some("Illinois".to_string()),
        country: Some("United States".to_string()),
        ..Default::default()
    }
}

fn paris() -> GeocodedAddress {
    GeocodedAddress {
        city: Some("Paris".to_string()),
        state: Some("Ile-de-France".to_string()),
        country: Some("France".to_string()),
        ..Default::default()
    }
}

/// Record `i` routes to `behaviors[i]` via its latitude.
fn record(i: usize) -> LocationRecord {
    LocationRecord {
        id: (i + 1).to_string(),
        latitude: i as f64,
        longitude: 0.0,
        claimed_city: "Springfield".to_string(),
        claimed_city_alt: String::new(),
        claimed_country: "US".to_string(),
        claimed_state: Some("IL".to_string()),
    }
}

fn unchecked_dataset(count: usize) -> Dataset {
    let mut dataset = Dataset::default();
    for i in 0..count {
        dataset.push(record(i), VerificationStatus::Unchecked);
    }
    dataset
}

fn scheduler(service: Arc<MockService>, batch_size: usize) -> BatchScheduler {
    scheduler_with_deadlines(
        service,
        batch_size,
        Duration::from_secs(600),
        Duration::from_secs(3_600),
    )
}

fn scheduler_with_deadlines(
    service: Arc<MockService>,
    batch_size: usize,
    per_task_timeout: Duration,
    batch_timeout: Duration,
) -> BatchScheduler {
    let client = Arc::new(RetryingGeocodeClient::new(service, 3, Duration::ZERO));
    BatchScheduler::new(client, batch_size, 2, per_task_timeout, batch_timeout)
}

fn checkpoint_in(dir: &tempfile::TempDir) -> CheckpointWriter {
    CheckpointWriter::new(dir.path().join("tagged.csv"))
}

#[tokio::test(start_paused = true)]
async fn test_verdicts_applied_and_checkpointed() {
    let service = MockService::new(vec![
        Behavior::Match,
        Behavior::WrongCountry,
        Behavior::Empty,
        Behavior::Fail,
        Behavior::AlwaysTimeout,
    ]);
    let mut dataset = unchecked_dataset(5);
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = checkpoint_in(&dir);
    let stats = ProcessingStats::new();

    let report = scheduler(Arc::clone(&service), 2)
        .process(&mut dataset, &checkpoint, &stats)
        .await
        .unwrap();

    assert_eq!(report.total, 5);
    assert_eq!(report.processed, 5);
    assert_eq!(report.batches, 3);

    assert_eq!(dataset.status(0), VerificationStatus::Accurate);
    assert_eq!(dataset.status(1), VerificationStatus::InaccurateCountry);
    assert_eq!(dataset.status(2), VerificationStatus::Unknown);
    assert_eq!(dataset.status(3), VerificationStatus::Error);
    assert_eq!(dataset.status(4), VerificationStatus::Timeout);

    // The checkpoint on disk agrees and holds no unchecked records.
    let persisted = load_dataset(checkpoint.path()).unwrap();
    assert_eq!(persisted.statuses(), dataset.statuses());
    assert!(persisted.unchecked_indices().is_empty());

    assert_eq!(stats.total(), 5);
    assert_eq!(stats.count(VerificationStatus::Accurate), 1);
    assert_eq!(stats.count(VerificationStatus::Timeout), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rerun_only_touches_unchecked() {
    let service = MockService::new(vec![Behavior::Match, Behavior::Match, Behavior::Match]);
    let mut dataset = Dataset::default();
    dataset.push(record(0), VerificationStatus::Inaccurate);
    dataset.push(record(1), VerificationStatus::Unchecked);
    dataset.push(record(2), VerificationStatus::Timeout);

    let dir = tempfile::tempdir().unwrap();
    let stats = ProcessingStats::new();
    let report = scheduler(Arc::clone(&service), 10)
        .process(&mut dataset, &checkpoint_in(&dir), &stats)
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    // Prior verdicts survive; only the unchecked record was looked up.
    assert_eq!(dataset.status(0), VerificationStatus::Inaccurate);
    assert_eq!(dataset.status(1), VerificationStatus::Accurate);
    assert_eq!(dataset.status(2), VerificationStatus::Timeout);
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_run_writes_no_checkpoint() {
    let service = MockService::new(vec![]);
    let mut dataset = Dataset::default();
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = checkpoint_in(&dir);

    let report = scheduler(service, 10)
        .process(&mut dataset, &checkpoint, &ProcessingStats::new())
        .await
        .unwrap();

    assert_eq!(report.batches, 0);
    assert!(!checkpoint.path().exists());
}

#[tokio::test(start_paused = true)]
async fn test_per_task_deadline_marks_timeout() {
    let service = MockService::new(vec![Behavior::Slow(Duration::from_secs(60)), Behavior::Match]);
    let mut dataset = unchecked_dataset(2);
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = checkpoint_in(&dir);

    let sched = scheduler_with_deadlines(
        service,
        10,
        Duration::from_secs(5),
        Duration::from_secs(3_600),
    );
    sched
        .process(&mut dataset, &checkpoint, &ProcessingStats::new())
        .await
        .unwrap();

    // The slow worker missed its own deadline; the batch deadline never fired.
    assert_eq!(dataset.status(0), VerificationStatus::Timeout);
    assert_eq!(dataset.status(1), VerificationStatus::Accurate);
}

#[tokio::test(start_paused = true)]
async fn test_batch_deadline_abandons_stragglers_but_checkpoints() {
    let service = MockService::new(vec![Behavior::Match, Behavior::Hang, Behavior::Hang]);
    let mut dataset = unchecked_dataset(3);
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = checkpoint_in(&dir);

    // Per-task deadline is looser than the batch deadline, so only the
    // batch-wide cutoff can reap the hung workers.
    let sched = scheduler_with_deadlines(
        service,
        10,
        Duration::from_secs(10_000),
        Duration::from_secs(30),
    );
    let report = sched
        .process(&mut dataset, &checkpoint, &ProcessingStats::new())
        .await
        .unwrap();

    assert_eq!(dataset.status(0), VerificationStatus::Accurate);
    assert_eq!(dataset.status(1), VerificationStatus::Timeout);
    assert_eq!(dataset.status(2), VerificationStatus::Timeout);

    // The batch still checkpointed with every record terminal.
    assert_eq!(report.batches, 1);
    let persisted = load_dataset(checkpoint.path()).unwrap();
    assert!(persisted.unchecked_indices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_persistence_failure_halts_run() {
    let service = MockService::new(vec![Behavior::Match, Behavior::Match]);
    let mut dataset = unchecked_dataset(2);
    // Directory path as the checkpoint target: the rename must fail.
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = CheckpointWriter::new(dir.path());

    let result = scheduler(Arc::clone(&service), 1)
        .process(&mut dataset, &checkpoint, &ProcessingStats::new())
        .await;

    assert!(result.is_err());
    // First batch failed to persist, so the second was never dispatched.
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}
