//! CLI argument definitions.

use crate::cli::validators::{parse_duration_secs, parse_lock_timeout, parse_workers};
use crate::config::StationKeyMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Trim earthquake event windows from a continuous miniSEED archive into SAC files.
#[derive(Debug, Parser)]
#[command(name = "seistrim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for the extraction run.
    #[command(flatten)]
    pub run: RunArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for an extraction run.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Root of the continuous archive (contains YYYYMMDD day folders).
    #[arg(short, long, env = "SEISTRIM_ARCHIVE_ROOT")]
    pub archive_root: Option<PathBuf>,

    /// Event catalog file (time lat lon depth mag per line).
    #[arg(short, long, env = "SEISTRIM_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Station inventory file.
    #[arg(short, long, env = "SEISTRIM_STATIONS")]
    pub stations: Option<PathBuf>,

    /// Root of the output tree.
    #[arg(short, long, env = "SEISTRIM_OUTPUT_ROOT")]
    pub output_root: Option<PathBuf>,

    /// Event window length in seconds (1-86400).
    #[arg(short, long, value_parser = parse_duration_secs, env = "SEISTRIM_DURATION")]
    pub duration: Option<u32>,

    /// Number of worker threads (0 = one per CPU).
    #[arg(short = 'j', long, value_parser = parse_workers, env = "SEISTRIM_WORKERS")]
    pub workers: Option<usize>,

    /// Station inventory join granularity (component, channel).
    #[arg(long, env = "SEISTRIM_STATION_KEY")]
    pub station_key: Option<StationKeyMode>,

    /// Remove station locks older than this (e.g. 30m, 2h, 1d).
    #[arg(long, value_parser = parse_lock_timeout, env = "SEISTRIM_STALE_LOCK_TIMEOUT")]
    pub stale_lock_timeout: Option<Duration>,

    /// Configuration file (default: platform config directory).
    #[arg(long, env = "SEISTRIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reprocess stations even if output exists.
    #[arg(long)]
    pub force: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}
