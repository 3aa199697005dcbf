//! CLI argument definitions using clap
//!
//! Commands:
//! - fedstream run --plan <path> [--config <path>]
//! - fedstream check --plan <path> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fedstream - stream the results of a federated query plan
#[derive(Parser, Debug)]
#[command(name = "fedstream")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a plan and print every solution as a JSON line
    Run {
        /// Path to the plan document
        #[arg(long)]
        plan: PathBuf,

        /// Path to the execution configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a plan and print its output variables
    Check {
        /// Path to the plan document
        #[arg(long)]
        plan: PathBuf,

        /// Path to the execution configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
