//! Solution shape errors

use thiserror::Error;

/// Result type for solution construction
pub type SolutionResult<T> = Result<T, SolutionError>;

/// A solution or variable list was built with an inconsistent shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolutionError {
    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),

    #[error("Arity mismatch: {expected} variables but {actual} values")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Variable mismatch: expected {expected}, got {actual}")]
    VariableMismatch { expected: String, actual: String },
}

impl SolutionError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SolutionError::DuplicateVariable(_) => "FED_DUPLICATE_VARIABLE",
            SolutionError::ArityMismatch { .. } => "FED_ARITY_MISMATCH",
            SolutionError::VariableMismatch { .. } => "FED_VARIABLE_MISMATCH",
        }
    }
}
