//! Observable events for fedstream
//!
//! Every log line emitted by the engine names one of these events.
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events raised while streaming results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Execution configuration loaded
    ConfigLoaded,

    // Executor lifecycle
    /// A merge was requested from an executor that was already closed
    ExecutorClosedMerge,
    /// Executor shut down its worker pool
    ExecutorShutdown,
    /// Worker pool refused a producer task
    PoolRejected,
    /// A worker job panicked
    WorkerPanic,
    /// Worker pool started a worker to cover for blocked ones
    PoolGrowth,

    // Producers
    /// A child source failed while being pulled by a producer task
    ProducerFault,

    // Combinators
    /// Closing a child stream failed
    CloseFailed,
    /// A bounded distinct window evicted its first entry
    WindowEviction,
    /// Cartesian ready-count product overflowed
    CartesianReadyOverflow,
    /// A required cartesian dimension was empty
    CartesianEmptyDimension,
    /// Filter include/exclude counters at close
    FilterStats,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::ExecutorClosedMerge => "EXECUTOR_CLOSED_MERGE",
            Event::ExecutorShutdown => "EXECUTOR_SHUTDOWN",
            Event::PoolRejected => "POOL_SUBMIT_REJECTED",
            Event::WorkerPanic => "WORKER_PANIC",
            Event::PoolGrowth => "POOL_GROWTH",

            Event::ProducerFault => "PRODUCER_FAULT",

            Event::CloseFailed => "CLOSE_FAILED",
            Event::WindowEviction => "DISTINCT_WINDOW_EVICTION",
            Event::CartesianReadyOverflow => "CARTESIAN_READY_OVERFLOW",
            Event::CartesianEmptyDimension => "CARTESIAN_EMPTY_DIMENSION",
            Event::FilterStats => "FILTER_STATS",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::ExecutorShutdown => Severity::Info,
            Event::CartesianEmptyDimension | Event::FilterStats | Event::PoolGrowth => {
                Severity::Trace
            }
            Event::WorkerPanic => Severity::Error,
            Event::ExecutorClosedMerge
            | Event::PoolRejected
            | Event::ProducerFault
            | Event::CloseFailed
            | Event::WindowEviction
            | Event::CartesianReadyOverflow => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::ExecutorClosedMerge,
            Event::ExecutorShutdown,
            Event::PoolRejected,
            Event::WorkerPanic,
            Event::PoolGrowth,
            Event::ProducerFault,
            Event::CloseFailed,
            Event::WindowEviction,
            Event::CartesianReadyOverflow,
            Event::CartesianEmptyDimension,
            Event::FilterStats,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fault_events_are_warnings() {
        assert_eq!(Event::ProducerFault.severity(), Severity::Warn);
        assert_eq!(Event::WindowEviction.severity(), Severity::Warn);
        assert_eq!(Event::FilterStats.severity(), Severity::Trace);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::PoolRejected), "POOL_SUBMIT_REJECTED");
    }
}
