//! CLI command definitions
//!
//! Defines the clap commands for the harness.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenario files, in the order given
    Run {
        /// Scenario YAML files; dependent variants belong in one file,
        /// separate files are attempted even when an earlier one fails
        #[arg(required = true)]
        scenarios: Vec<PathBuf>,

        /// Emit the outcomes as JSON on stdout after the run
        #[arg(long)]
        json: bool,

        /// Keep scenario artifacts instead of cleaning up (post-mortem)
        #[arg(long)]
        keep: bool,

        /// Echo each command line and failure output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Load and validate scenario files without executing them
    Validate {
        /// Scenario YAML files to check
        #[arg(required = true)]
        scenarios: Vec<PathBuf>,
    },

    /// Print the harness configuration file path
    ConfigPath,
}
