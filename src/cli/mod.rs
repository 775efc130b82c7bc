//! CLI module for syncroute
//!
//! Provides command-line interface for:
//! - check: validate configuration
//! - evaluate: route one revision read from files
//! - run: route JSON lines from stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, evaluate, route_stream, run_command, RunSummary};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_response, RevisionInput};

/// Parse arguments and dispatch
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
