//! Verdict statistics for a run.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use log::info;
use strum::IntoEnumIterator;

use crate::models::VerificationStatus;

/// Counts verdicts as the scheduler applies them; printed at end of run.
#[derive(Debug, Default)]
pub struct ProcessingStats {
    counts: Mutex<HashMap<VerificationStatus, usize>>,
}

impl ProcessingStats {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one verdict.
    pub fn record(&self, status: VerificationStatus) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        *counts.entry(status).or_insert(0) += 1;
    }

    /// Count for one verdict.
    pub fn count(&self, status: VerificationStatus) -> usize {
        let counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.get(&status).copied().unwrap_or(0)
    }

    /// Total verdicts recorded.
    pub fn total(&self) -> usize {
        let counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.values().sum()
    }

    /// Logs a per-verdict summary, skipping zero rows.
    pub fn log_summary(&self) {
        let total = self.total();
        if total == 0 {
            return;
        }
        info!("Verdict summary ({total} records):");
        for status in VerificationStatus::iter() {
            let count = self.count(status);
            if count > 0 {
                info!("  {status}: {count}");
            }
        }
    }
}
