//! CLI parse: clap types for treesync. No behavior; definitions only.

use crate::scheduler::TimeUnit;
use crate::tree::hasher::DigestAlgorithm;
use clap::Parser;
use std::path::PathBuf;

/// treesync - keep a replica directory identical to a source directory
#[derive(Parser, Debug)]
#[command(name = "treesync")]
#[command(about = "One-way directory replication driven by content hashes")]
pub struct Cli {
    /// Source directory
    pub source: Option<PathBuf>,

    /// Replica directory
    pub replica: Option<PathBuf>,

    /// Sync log file (must not be inside source or replica)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Sync frequency, in --unit
    #[arg(long, allow_negative_numbers = true)]
    pub every: Option<i64>,

    /// Time unit for --every
    #[arg(long, value_enum)]
    pub unit: Option<TimeUnit>,

    /// Digest used for content hashing
    #[arg(long, value_enum)]
    pub digest: Option<DigestAlgorithm>,

    /// Run a single sync and exit
    #[arg(long)]
    pub once: bool,

    /// Print the operations a sync would apply, then exit
    #[arg(long, conflicts_with = "once")]
    pub dry_run: bool,

    /// Do not mirror sync log lines to stdout
    #[arg(long)]
    pub no_mirror: bool,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging and print the effective configuration
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Diagnostic log file path (if output is "file")
    #[arg(long)]
    pub log_diagnostics_file: Option<PathBuf>,
}
