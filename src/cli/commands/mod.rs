//! CLI command implementations

mod blend;
mod merge_scaled;
mod merge_seq;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};
use crate::error::Result;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match cli.command {
        Command::Blend(args) => blend::run_blend(args, log_level),
        Command::MergeScaled(args) => merge_scaled::run_merge_scaled(args, log_level),
        Command::MergeSeq(args) => merge_seq::run_merge_seq(args, log_level),
    }
}
