//! Configuration error types
//!
//! Every configuration error is fatal to the run that loads it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::executor::ExecutorError;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to start executor: {0}")]
    Executor(#[from] ExecutorError),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "FED_CONFIG_READ",
            ConfigError::Parse(_) => "FED_CONFIG_PARSE",
            ConfigError::Invalid { .. } => "FED_CONFIG_INVALID",
            ConfigError::Executor(_) => "FED_CONFIG_EXECUTOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::invalid("buffer_size", "must be > 0");
        assert_eq!(err.to_string(), "Invalid value for buffer_size: must be > 0");
        assert_eq!(err.code(), "FED_CONFIG_INVALID");
    }
}
