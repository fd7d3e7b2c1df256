use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hostcheck: point-in-time host health diagnostics
///
/// Samples system metrics once, classifies them against threshold ladders,
/// groups related processes and reports drift since the previous run.
#[derive(Parser, Debug)]
#[command(name = "hostcheck")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute (defaults to `scan`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Replay metrics and processes from a JSON fixture instead of sampling the host
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a one-shot diagnostic scan
    #[command(alias = "sc")]
    Scan {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Neither read nor write the last-run snapshot
        #[arg(long)]
        no_history: bool,
    },

    /// List queued fixes, or print the commands of a selection
    #[command(alias = "f")]
    Fixes {
        /// Selection: `all`, `skip`, or indices such as `0,2`
        #[arg(short, long)]
        select: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
