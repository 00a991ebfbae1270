//! Batch scheduling: bounded concurrency, deadlines, checkpointing.
//!
//! The scheduler walks the unchecked records in fixed-size batches. Each
//! batch is dispatched to a semaphore-bounded pool of workers; workers
//! report `(index, verdict)` over a channel and never touch the dataset.
//! The scheduler is the only writer, which keeps status updates race-free.
//!
//! Two deadlines bound a batch. The per-record deadline wraps each worker's
//! lookup; a worker that misses it yields `timeout` for its record. The
//! batch deadline caps the whole drain: when it fires, every record still
//! in flight is marked `timeout`, the straggler tasks are aborted, and any
//! result they manage to produce afterwards is discarded with the channel.
//! A record marked `timeout` stays eligible for a future run.
//!
//! After each batch the full dataset snapshot is checkpointed. Batches run
//! strictly in sequence so a resumed run always starts at a clean batch
//! boundary. A checkpoint failure halts the run.

mod worker;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::{mpsc, Semaphore};

use crate::checkpoint::CheckpointWriter;
use crate::config::Config;
use crate::error_handling::{PersistenceError, ProcessingStats};
use crate::geocode::RetryingGeocodeClient;
use crate::models::{Dataset, VerificationStatus};

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Records in the dataset.
    pub total: usize,
    /// Records processed this run (previously unchecked).
    pub processed: usize,
    /// Batches dispatched and checkpointed.
    pub batches: usize,
    /// Wall-clock time for the run.
    pub elapsed_seconds: f64,
}

/// Drives the verification run batch by batch.
pub struct BatchScheduler {
    client: Arc<RetryingGeocodeClient>,
    batch_size: usize,
    max_concurrent: usize,
    per_task_timeout: Duration,
    batch_timeout: Duration,
}

impl BatchScheduler {
    /// Creates a scheduler with explicit limits.
    pub fn new(
        client: Arc<RetryingGeocodeClient>,
        batch_size: usize,
        max_concurrent: usize,
        per_task_timeout: Duration,
        batch_timeout: Duration,
    ) -> Self {
        BatchScheduler {
            client,
            batch_size: batch_size.max(1),
            max_concurrent: max_concurrent.max(1),
            per_task_timeout,
            batch_timeout,
        }
    }

    /// Creates a scheduler from pipeline configuration.
    pub fn from_config(client: Arc<RetryingGeocodeClient>, config: &Config) -> Self {
        Self::new(
            client,
            config.batch_size,
            config.max_concurrent,
            config.per_task_timeout(),
            config.batch_timeout(),
        )
    }

    /// Processes every unchecked record, checkpointing after each batch.
    ///
    /// Records already carrying a verdict are left untouched, so re-running
    /// over a partially tagged dataset resumes where the last run stopped.
    ///
    /// # Errors
    ///
    /// Returns the first [`PersistenceError`] from the checkpoint writer;
    /// the run stops at that batch rather than computing verdicts the next
    /// run cannot see.
    pub async fn process(
        &self,
        dataset: &mut Dataset,
        checkpoint: &CheckpointWriter,
        stats: &ProcessingStats,
    ) -> Result<RunReport, PersistenceError> {
        let pending = dataset.unchecked_indices();
        let total_batches = pending.len().div_ceil(self.batch_size);
        let start = std::time::Instant::now();

        info!(
            "{} of {} records unchecked; {} batch(es) of up to {}",
            pending.len(),
            dataset.len(),
            total_batches,
            self.batch_size
        );

        let mut batches = 0usize;
        for (batch_number, batch) in pending.chunks(self.batch_size).enumerate() {
            info!(
                "Batch {}/{}: dispatching {} records",
                batch_number + 1,
                total_batches,
                batch.len()
            );

            self.run_batch(batch, dataset, stats).await;

            checkpoint.persist(dataset)?;
            batches += 1;
            info!(
                "Batch {}/{} checkpointed to {}",
                batch_number + 1,
                total_batches,
                checkpoint.path().display()
            );
        }

        Ok(RunReport {
            total: dataset.len(),
            processed: pending.len(),
            batches,
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }

    /// Dispatches one batch and drains results until completion or the
    /// batch deadline. Every index in `batch` holds a terminal status when
    /// this returns.
    async fn run_batch(&self, batch: &[usize], dataset: &mut Dataset, stats: &ProcessingStats) {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let (tx, mut rx) = mpsc::channel::<(usize, VerificationStatus)>(batch.len().max(1));

        let mut handles = Vec::with_capacity(batch.len());
        for &index in batch {
            let record = dataset.records()[index].clone();
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            let per_task_timeout = self.per_task_timeout;

            handles.push(tokio::spawn(async move {
                // Closed semaphore means the batch was abandoned; just exit.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };

                let verdict =
                    match tokio::time::timeout(per_task_timeout, worker::verify_record(&client, &record))
                        .await
                    {
                        Ok(verdict) => verdict,
                        Err(_) => {
                            warn!(
                                "[{}] worker exceeded {:.0}s deadline",
                                record.id,
                                per_task_timeout.as_secs_f64()
                            );
                            VerificationStatus::Timeout
                        }
                    };

                let _ = tx.send((index, verdict)).await;
            }));
        }
        drop(tx);

        let deadline = tokio::time::Instant::now() + self.batch_timeout;
        let mut completed: HashMap<usize, VerificationStatus> =
            HashMap::with_capacity(batch.len());

        loop {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some((index, verdict))) => {
                    completed.insert(index, verdict);
                }
                // All worker senders dropped: the batch fully drained.
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Batch deadline elapsed with {} of {} records outstanding",
                        batch.len() - completed.len(),
                        batch.len()
                    );
                    break;
                }
            }
        }

        // Abandon stragglers. A worker that already finished its lookup but
        // has not sent yet loses the race; its late result is discarded with
        // the channel rather than applied behind our back.
        semaphore.close();
        for handle in &handles {
            handle.abort();
        }
        rx.close();
        // Reap the tasks so nothing from this batch outlives its checkpoint.
        let _ = futures::future::join_all(handles).await;

        for &index in batch {
            let verdict = completed
                .get(&index)
                .copied()
                .unwrap_or(VerificationStatus::Timeout);
            dataset.set_status(index, verdict);
            stats.record(verdict);
        }
    }
}

#[cfg(test)]
mod tests;
