//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::plan::PlanError;
use crate::results::ResultsError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Plan document error
    PlanError,
    /// Streaming failed
    ExecutionError,
    /// I/O error (stdout)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FED_CLI_CONFIG_ERROR",
            Self::PlanError => "FED_CLI_PLAN_ERROR",
            Self::ExecutionError => "FED_CLI_EXECUTION_ERROR",
            Self::IoError => "FED_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn plan_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::PlanError, msg)
    }

    pub fn execution_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ExecutionError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(format!("[{}] {}", e.code(), e))
    }
}

impl From<PlanError> for CliError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Config(inner) => inner.into(),
            other => Self::plan_error(format!("[{}] {}", other.code(), other)),
        }
    }
}

impl From<ResultsError> for CliError {
    fn from(e: ResultsError) -> Self {
        Self::execution_error(format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_both_codes() {
        let err = CliError::from(ResultsError::EmptyStream);
        assert_eq!(err.code(), &CliErrorCode::ExecutionError);
        assert!(err.to_string().starts_with("FED_CLI_EXECUTION_ERROR: [FED_EMPTY_STREAM]"));
    }

    #[test]
    fn test_plan_config_error_maps_to_config() {
        let err = CliError::from(PlanError::Config(ConfigError::invalid("buffer_size", "must be > 0")));
        assert_eq!(err.code_str(), "FED_CLI_CONFIG_ERROR");
    }
}
