//! Execution configuration file
//!
//! ```json
//! {
//!   "buffer_size": 64,
//!   "worker_threads": 8,
//!   "window_size": 250000,
//!   "executor": "buffered",
//!   "fault_policy": "contain",
//!   "log_level": "warn"
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::distinct::DEFAULT_WINDOW_SIZE;
use crate::executor::{
    BufferedResultsExecutor, FaultPolicy, ResultsExecutor, SequentialResultsExecutor,
};
use crate::observability::{log_event_with_fields, Event, Severity};

use super::errors::{ConfigError, ConfigResult};

/// Which fan-in strategy `union` nodes use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    #[default]
    Buffered,
    Sequential,
}

impl ExecutorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutorKind::Buffered => "buffered",
            ExecutorKind::Sequential => "sequential",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Unconsumed solutions allowed per producer
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Window of bounded distinct
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    #[serde(default)]
    pub executor: ExecutorKind,

    #[serde(default)]
    pub fault_policy: FaultPolicy,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_buffer_size() -> usize {
    64
}
fn default_worker_threads() -> usize {
    BufferedResultsExecutor::default_threads()
}
fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            worker_threads: default_worker_threads(),
            window_size: default_window_size(),
            executor: ExecutorKind::default(),
            fault_policy: FaultPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl ExecutionConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("buffer_size", &config.buffer_size.to_string()),
                ("executor", config.executor.as_str()),
                ("path", &path.display().to_string()),
                ("worker_threads", &config.worker_threads.to_string()),
            ],
        );
        Ok(config)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: ExecutionConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.buffer_size == 0 {
            return Err(ConfigError::invalid("buffer_size", "must be > 0"));
        }
        if self.worker_threads == 0 {
            return Err(ConfigError::invalid("worker_threads", "must be > 0"));
        }
        if self.window_size == 0 {
            return Err(ConfigError::invalid("window_size", "must be > 0"));
        }
        self.severity()?;
        Ok(())
    }

    /// Minimum log severity named by `log_level`
    pub fn severity(&self) -> ConfigResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConfigError::invalid(
                "log_level",
                format!("'{}' is not one of trace, info, warn, error", self.log_level),
            )
        })
    }

    /// Start the configured executor
    pub fn build_executor(&self) -> ConfigResult<Arc<dyn ResultsExecutor>> {
        Ok(match self.executor {
            ExecutorKind::Buffered => Arc::new(BufferedResultsExecutor::with_policy(
                self.worker_threads,
                self.fault_policy,
            )?),
            ExecutorKind::Sequential => Arc::new(SequentialResultsExecutor::new()),
        })
    }
}
