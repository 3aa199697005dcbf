//! Executor metrics
//!
//! - Counters only
//! - Monotonic increase for the lifetime of one executor
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of one results executor
///
/// Producer threads and the consuming thread update these concurrently.
/// Relaxed ordering is enough; counters are diagnostics, not synchronization.
#[derive(Debug, Default)]
pub struct ExecutorMetrics {
    /// Merge requests served
    merges: AtomicU64,
    /// Producer runs handed to the worker pool
    tasks_scheduled: AtomicU64,
    /// Producer runs the worker pool refused
    submissions_rejected: AtomicU64,
    /// Solutions handed from producers to consumers
    solutions_delivered: AtomicU64,
    /// Producers that reached the end of their child
    producers_exhausted: AtomicU64,
    /// Child failures observed by producers
    producer_faults: AtomicU64,
}

impl ExecutorMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_merges(&self) {
        self.merges.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_tasks_scheduled(&self) {
        self.tasks_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_submissions_rejected(&self) {
        self.submissions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_solutions_delivered(&self) {
        self.solutions_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_producers_exhausted(&self) {
        self.producers_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_producer_faults(&self) {
        self.producer_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            merges: self.merges.load(Ordering::Relaxed),
            tasks_scheduled: self.tasks_scheduled.load(Ordering::Relaxed),
            submissions_rejected: self.submissions_rejected.load(Ordering::Relaxed),
            solutions_delivered: self.solutions_delivered.load(Ordering::Relaxed),
            producers_exhausted: self.producers_exhausted.load(Ordering::Relaxed),
            producer_faults: self.producer_faults.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the executor counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub merges: u64,
    pub tasks_scheduled: u64,
    pub submissions_rejected: u64,
    pub solutions_delivered: u64,
    pub producers_exhausted: u64,
    pub producer_faults: u64,
}
