//! Results error types
//!
//! Error kinds:
//! - Stream protocol errors (`next()` with nothing pending) are programmer
//!   errors and fail fast
//! - Close errors are surfaced to the caller of `close()`; several failures
//!   are aggregated into one error with the rest attached as suppressed
//! - Source and producer errors report a failing upstream source

use thiserror::Error;

use crate::solution::SolutionError;

/// Result type for results operations
pub type ResultsResult<T> = Result<T, ResultsError>;

/// Errors raised while pulling from or releasing a results stream
#[derive(Debug, Clone, Error)]
pub enum ResultsError {
    #[error("Empty stream: next() called with no pending solution")]
    EmptyStream,

    #[error("Source failed: {0}")]
    Source(String),

    #[error("Close failed: {0}")]
    Close(String),

    #[error("{primary} (+{} suppressed)", .suppressed.len())]
    Aggregated {
        #[source]
        primary: Box<ResultsError>,
        suppressed: Vec<ResultsError>,
    },

    #[error("Replay requested before the source was drained")]
    IncompleteReplay,

    #[error("Cartesian inputs share variables: {0:?}")]
    OverlappingVariables(Vec<String>),

    #[error("Invalid solution shape: {0}")]
    InvalidShape(#[from] SolutionError),

    #[error("Producer {producer} failed: {message}")]
    Producer { producer: usize, message: String },
}

impl ResultsError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ResultsError::EmptyStream => "FED_EMPTY_STREAM",
            ResultsError::Source(_) => "FED_SOURCE_FAILED",
            ResultsError::Close(_) => "FED_CLOSE_FAILED",
            ResultsError::Aggregated { .. } => "FED_CLOSE_AGGREGATED",
            ResultsError::IncompleteReplay => "FED_INCOMPLETE_REPLAY",
            ResultsError::OverlappingVariables(_) => "FED_OVERLAPPING_VARIABLES",
            ResultsError::InvalidShape(_) => "FED_INVALID_SHAPE",
            ResultsError::Producer { .. } => "FED_PRODUCER_FAILED",
        }
    }

    /// Programmer errors: misuse of the stream protocol or of a combinator.
    /// These are not retried.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            ResultsError::EmptyStream
                | ResultsError::IncompleteReplay
                | ResultsError::OverlappingVariables(_)
                | ResultsError::InvalidShape(_)
        )
    }

    /// Secondary failures carried by an aggregated error
    pub fn suppressed(&self) -> &[ResultsError] {
        match self {
            ResultsError::Aggregated { suppressed, .. } => suppressed,
            _ => &[],
        }
    }
}
