//! Executor error types
//!
//! Error codes:
//! - FED_WORKER_SPAWN (FATAL)
//! - FED_INVALID_THREAD_COUNT (ERROR)

use thiserror::Error;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Worker-pool and executor lifecycle errors
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("Invalid worker thread count: {0}")]
    InvalidThreadCount(usize),
}

impl ExecutorError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::WorkerSpawn(_) => "FED_WORKER_SPAWN",
            ExecutorError::InvalidThreadCount(_) => "FED_INVALID_THREAD_COUNT",
        }
    }

    /// A pool that cannot start its threads leaves nothing to execute on
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecutorError::WorkerSpawn(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ExecutorError::from(std::io::Error::new(std::io::ErrorKind::Other, "no"));
        assert_eq!(err.code(), "FED_WORKER_SPAWN");
        assert_eq!(
            ExecutorError::InvalidThreadCount(0).code(),
            "FED_INVALID_THREAD_COUNT"
        );
    }

    #[test]
    fn test_spawn_failure_is_fatal() {
        let err = ExecutorError::from(std::io::Error::new(std::io::ErrorKind::Other, "no"));
        assert!(err.is_fatal());
        assert!(!ExecutorError::InvalidThreadCount(0).is_fatal());
    }
}
