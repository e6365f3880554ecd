//! Command line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "dltrack", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level filter; RUST_LOG takes precedence
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Log output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch today's download counts and merge them into the ledger
    Fetch,
    /// Render the PNG and HTML charts from the ledger
    Plot,
    /// Fetch, then plot
    Run,
}
