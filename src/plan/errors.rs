//! Plan document error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::results::ResultsError;
use crate::solution::SolutionError;

/// Result type for plan loading and building
pub type PlanResult<T> = Result<T, PlanError>;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read plan {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid plan JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid row: {0}")]
    Shape(#[from] SolutionError),

    #[error("Unknown variable '{var}' (available: {available})")]
    UnknownVariable { var: String, available: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(transparent)]
    Results(#[from] ResultsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PlanError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::Read { .. } => "FED_PLAN_READ",
            PlanError::Parse(_) => "FED_PLAN_PARSE",
            PlanError::Shape(_) => "FED_PLAN_SHAPE",
            PlanError::UnknownVariable { .. } => "FED_PLAN_UNKNOWN_VARIABLE",
            PlanError::InvalidPattern { .. } => "FED_PLAN_INVALID_PATTERN",
            PlanError::Results(e) => e.code(),
            PlanError::Config(e) => e.code(),
        }
    }
}
