//! Execution configuration
//!
//! The numeric knobs of the engine (producer buffer size, worker pool size,
//! distinct window) plus the fan-in strategy, producer fault policy and
//! log level, loaded from one JSON file and validated before use.

mod errors;
mod execution;

pub use errors::{ConfigError, ConfigResult};
pub use execution::{ExecutionConfig, ExecutorKind};
