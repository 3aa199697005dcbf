//! Close-error aggregation
//!
//! Closing a combinator closes all of its children even when some of them
//! fail. No failure: `Ok`. One failure: that error. Several: an
//! `Aggregated` error whose primary is the first failure and whose
//! suppressed list holds the rest, in close order.

use crate::observability::{log_event_with_fields, Event};

use super::errors::{ResultsError, ResultsResult};
use super::results::Results;

/// Collects close failures across several children
#[derive(Debug, Default)]
pub struct CloseErrors {
    errors: Vec<ResultsError>,
}

impl CloseErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close one child, recording its failure
    pub fn close<R: Results + ?Sized>(&mut self, results: &mut R) {
        self.record(results.close());
    }

    /// Record the outcome of a close call made elsewhere
    pub fn record(&mut self, outcome: ResultsResult<()>) {
        if let Err(err) = outcome {
            log_event_with_fields(
                Event::CloseFailed,
                &[("code", err.code()), ("error", &err.to_string())],
            );
            self.errors.push(err);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> ResultsResult<()> {
        let mut errors = self.errors.into_iter();
        match errors.next() {
            None => Ok(()),
            Some(first) => {
                let suppressed: Vec<ResultsError> = errors.collect();
                if suppressed.is_empty() {
                    Err(first)
                } else {
                    Err(ResultsError::Aggregated {
                        primary: Box::new(first),
                        suppressed,
                    })
                }
            }
        }
    }
}
