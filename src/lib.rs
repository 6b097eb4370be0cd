//! Seistrim - seismic event window extraction.
//!
//! Cuts fixed-length windows around catalog events out of a continuous miniSEED
//! archive and writes one station- and event-tagged SAC record per channel.

#![warn(missing_docs)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod locking;
pub mod output;
pub mod pipeline;
pub mod sac;
pub mod seed;
pub mod utils;
pub mod waveform;

use catalog::{StationInventory, load_catalog, resolve_inventory_path};
use clap::Parser;
use cli::{Cli, Command};
use config::{
    Config, RunSettings, build_run_settings, config_file_path, load_config_file,
    load_default_config, save_config,
};
use output::{MissedStationLog, SacWriter};
use pipeline::{RunContext, RunSummary, run_events};
use std::path::Path;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the seistrim CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.run.verbose, cli.run.quiet);

    // Clean up lock files on Ctrl+C and SIGTERM
    if let Err(e) = ctrlc::set_handler(|| {
        locking::cleanup_all_locks();
        std::process::exit(130); // 128 + SIGINT(2)
    }) {
        warn!("Failed to install signal handler: {e}");
    }

    // Handle subcommands
    if let Some(Command::Config { action }) = cli.command {
        return handle_config_command(action, cli.run.config.as_deref());
    }

    let config = match &cli.run.config {
        Some(path) => load_config_file(path)?,
        None => load_default_config()?,
    };
    config::validate_config(&config)?;

    let settings = build_run_settings(&cli.run, &config)?;
    let progress_enabled = !cli.run.quiet && !cli.run.no_progress;
    extract(&settings, progress_enabled)?;

    Ok(())
}

/// Extract every catalog event with the given settings.
///
/// Catalog, inventory and worker-pool problems abort before any event is
/// dispatched. After that, problems only end the station or event they occur in.
pub fn extract(settings: &RunSettings, progress_enabled: bool) -> Result<RunSummary> {
    use crate::output::progress;
    use std::time::Instant;

    let total_start = Instant::now();

    info!("Loading event catalog: {}", settings.catalog.display());
    let events = load_catalog(&settings.catalog)?;
    info!("Found {} event(s)", events.len());

    let inventory_path = resolve_inventory_path(&settings.stations)?;
    info!("Loading station inventory: {}", inventory_path.display());
    let inventory = StationInventory::load(&inventory_path, settings.extraction.station_key)?;
    info!(
        "Loaded {} station component(s) keyed by {}",
        inventory.len(),
        inventory.mode()
    );

    std::fs::create_dir_all(&settings.output_root).map_err(|e| Error::OutputDirCreateFailed {
        path: settings.output_root.clone(),
        source: e,
    })?;

    let context = RunContext {
        archive_root: settings.archive_root.clone(),
        output_root: settings.output_root.clone(),
        extraction: settings.extraction.clone(),
        force: settings.force,
        stale_lock_timeout: settings.stale_lock_timeout,
        inventory,
        missed_log: MissedStationLog::in_output_root(&settings.output_root),
        writer: Box::new(SacWriter),
    };

    let event_progress = progress::create_event_progress(events.len(), progress_enabled);
    let summary = run_events(&events, &context, settings.workers, event_progress.as_ref())?;
    progress::finish_progress(event_progress, "Complete");

    let total_duration = total_start.elapsed().as_secs_f64();
    let stations = summary.stations;
    info!(
        "Complete: {} event(s) in {:.2}s; {} written, {} already present, {} locked, {} skipped",
        summary.events,
        total_duration,
        stations.written,
        stations.existing,
        stations.locked,
        stations.skipped
    );
    if stations.gap_samples > 0 {
        info!(
            "{} gap sample(s) zero-filled across written records",
            stations.gap_samples
        );
    }
    if summary.events_skipped > 0 {
        warn!(
            "{} event(s) skipped for incomplete day folders",
            summary.events_skipped
        );
    }
    if summary.events_failed > 0 {
        warn!("{} event(s) aborted by errors", summary.events_failed);
    }

    Ok(summary)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction, explicit: Option<&Path>) -> Result<()> {
    use cli::ConfigAction;

    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nNext steps:");
                println!("  set [paths] archive_root, catalog, stations and output_root");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config_file(&path)?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
