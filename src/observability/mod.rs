//! Observability subsystem for fedstream
//!
//! Provides:
//! - Structured logging (JSON lines on stderr)
//! - Executor counters
//! - Begin/complete scopes for CLI runs
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No background threads of its own
//!
//! # Usage
//!
//! ```ignore
//! use fedstream::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ProducerFault, &[("producer", "3")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
#[cfg(test)]
pub(crate) use logger::capture_events;
pub use metrics::{ExecutorMetrics, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log a typed event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a typed event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
