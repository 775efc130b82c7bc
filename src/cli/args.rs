//! CLI argument definitions using clap
//!
//! Commands:
//! - syncroute check --config <path>
//! - syncroute evaluate --config <path> --doc <path> [--old-doc <path>] [--meta <path>] [--now <ts>]
//! - syncroute run --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// syncroute - per-revision channel routing for document replication
#[derive(Parser, Debug)]
#[command(name = "syncroute")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the configuration and print the effective policy
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./syncroute.json")]
        config: PathBuf,
    },

    /// Route a single revision read from files
    Evaluate {
        /// Path to configuration file
        #[arg(long, default_value = "./syncroute.json")]
        config: PathBuf,

        /// JSON file holding the new revision
        #[arg(long)]
        doc: PathBuf,

        /// JSON file holding the prior revision
        #[arg(long)]
        old_doc: Option<PathBuf>,

        /// JSON file holding revision metadata
        #[arg(long)]
        meta: Option<PathBuf>,

        /// Evaluate as of this RFC 3339 instant instead of the system clock
        #[arg(long)]
        now: Option<String>,
    },

    /// Route revisions read as JSON lines from stdin
    Run {
        /// Path to configuration file
        #[arg(long, default_value = "./syncroute.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
