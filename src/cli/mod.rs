//! CLI module for fedstream
//!
//! Provides command-line interface for:
//! - run: Execute a plan document and stream its solutions
//! - check: Validate a plan document and print its output variables

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, execute, run, run_command, RunSummary};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_line;
