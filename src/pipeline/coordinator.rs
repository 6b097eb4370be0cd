//! Event coordination across the worker pool.

use crate::catalog::{EventRecord, StationInventory, StationKey};
use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::locking::StationLock;
use crate::output::{MissedStationLog, RecordWriter, event_dir, progress, station_glob};
use crate::pipeline::locator::locate_event_files;
use crate::pipeline::processor::process_station;
use crate::pipeline::TimeWindow;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Immutable inputs shared by every event of a run.
pub struct RunContext {
    /// Root of the continuous archive.
    pub archive_root: PathBuf,
    /// Root of the output tree.
    pub output_root: PathBuf,
    /// Window and naming settings.
    pub extraction: ExtractionConfig,
    /// Reprocess stations whose output already exists.
    pub force: bool,
    /// Age after which any station lock is considered abandoned.
    pub stale_lock_timeout: Option<Duration>,
    /// Station metadata.
    pub inventory: StationInventory,
    /// Shared join-miss log.
    pub missed_log: MissedStationLog,
    /// Record writer.
    pub writer: Box<dyn RecordWriter>,
}

/// One unit of work: an event together with the run context.
#[derive(Clone, Copy)]
pub struct EventTask<'a> {
    /// Event to extract.
    pub event: &'a EventRecord,
    /// Shared run inputs.
    pub context: &'a RunContext,
}

/// Result of checking whether a station should be processed.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessCheck {
    /// Station should be processed.
    Process,
    /// Skip - output already exists.
    SkipExists,
    /// Skip - station is locked by another process.
    SkipLocked,
}

/// Per-station counts for one event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventSummary {
    /// Records written.
    pub written: usize,
    /// Stations skipped because their output already existed.
    pub existing: usize,
    /// Stations skipped because another process held them.
    pub locked: usize,
    /// Stations skipped on a data or metadata problem.
    pub skipped: usize,
    /// Zero-filled samples across the written records.
    pub gap_samples: usize,
}

/// Totals over a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Events fully dispatched.
    pub events: usize,
    /// Events skipped because their day folders were incomplete.
    pub events_skipped: usize,
    /// Events aborted by an I/O fault.
    pub events_failed: usize,
    /// Station totals.
    pub stations: EventSummary,
}

impl RunSummary {
    fn add(&mut self, event: Option<EventSummary>) {
        self.events += 1;
        match event {
            Some(summary) => {
                self.stations.written += summary.written;
                self.stations.existing += summary.existing;
                self.stations.locked += summary.locked;
                self.stations.skipped += summary.skipped;
                self.stations.gap_samples += summary.gap_samples;
            }
            None => self.events_skipped += 1,
        }
    }
}

/// Decide whether a station of an event should be processed.
///
/// Only this station's records are considered; other stations in the event
/// sub-folder do not affect the decision. A lock left behind by an exited holder, or
/// older than `stale_after`, is removed instead of blocking the station.
pub fn should_process(
    event_dir: &Path,
    key: &StationKey,
    force: bool,
    stale_after: Option<Duration>,
) -> Result<ProcessCheck> {
    if StationLock::is_locked(event_dir, key) {
        if !StationLock::is_stale(event_dir, key, stale_after) {
            return Ok(ProcessCheck::SkipLocked);
        }
        warn!("Removing stale lock for {key} in {}", event_dir.display());
        if let Err(e) = StationLock::remove_stale(event_dir, key) {
            warn!("{e}");
            return Ok(ProcessCheck::SkipLocked);
        }
    }

    if !force {
        let pattern = station_glob(event_dir, key);
        let mut matches = glob::glob(&pattern).map_err(|e| Error::OutputPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        if matches.any(|entry| entry.is_ok()) {
            return Ok(ProcessCheck::SkipExists);
        }
    }

    Ok(ProcessCheck::Process)
}

/// Run one event: resolve its window, list its day folders and process every
/// station of the start folder.
///
/// Returns `None` when the event is skipped as a whole. Station-level problems are
/// counted in the summary; any other error aborts the event.
pub fn process_event(task: EventTask<'_>) -> Result<Option<EventSummary>> {
    let EventTask { event, context } = task;
    let extraction = &context.extraction;

    let window = TimeWindow::resolve(
        event.start_time,
        extraction.duration_secs,
        extraction.civil_offset_hours,
    );
    debug!(
        "Event {}: window {} .. {}, day folders {:?}",
        event.start_time, window.utc_start, window.utc_end, window.day_folder_keys
    );

    let Some(listings) =
        locate_event_files(&context.archive_root, &window, &extraction.archive_suffix)?
    else {
        return Ok(None);
    };

    let event_dir = event_dir(&context.output_root, &window.utc_start);
    let mut summary = EventSummary::default();

    for descriptor in &listings.start.files {
        let key = context.inventory.key_for(
            &descriptor.network,
            &descriptor.station,
            &descriptor.channel,
        );

        match should_process(&event_dir, &key, context.force, context.stale_lock_timeout)? {
            ProcessCheck::SkipExists => {
                debug!("Skipping (output exists): {} {}", window.utc_start, descriptor.id());
                summary.existing += 1;
                continue;
            }
            ProcessCheck::SkipLocked => {
                info!("Skipping (locked): {} {}", window.utc_start, descriptor.id());
                summary.locked += 1;
                continue;
            }
            ProcessCheck::Process => {}
        }

        match process_station(context, event, &window, &listings, descriptor, &event_dir) {
            Ok(result) => {
                info!(
                    "Wrote {} ({} samples{})",
                    result.path.display(),
                    result.samples,
                    if result.gap_samples > 0 {
                        format!(", {} zero-filled", result.gap_samples)
                    } else {
                        String::new()
                    }
                );
                summary.written += 1;
                summary.gap_samples += result.gap_samples;
            }
            Err(Error::StationLocked { .. }) => {
                info!("Skipping (locked): {} {}", window.utc_start, descriptor.id());
                summary.locked += 1;
            }
            Err(e) if e.is_station_skip() => {
                warn!("Skipping {} for event {}: {e}", descriptor.id(), window.utc_start);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Some(summary))
}

/// Run every event on a pool of `workers` threads (0 = one per CPU).
///
/// Events are independent; a failed event is logged and counted without affecting
/// the others.
pub fn run_events(
    events: &[EventRecord],
    context: &RunContext,
    workers: usize,
    progress_bar: Option<&ProgressBar>,
) -> Result<RunSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("seistrim-worker-{i}"))
        .build()
        .map_err(|e| Error::WorkerPool {
            reason: e.to_string(),
        })?;

    info!(
        "Processing {} event(s) on {} worker(s)",
        events.len(),
        pool.current_num_threads()
    );

    let results: Vec<Result<Option<EventSummary>>> = pool.install(|| {
        events
            .par_iter()
            .map(|event| {
                let result = process_event(EventTask { event, context });
                progress::inc_progress(progress_bar);
                result
            })
            .collect()
    });

    let mut summary = RunSummary::default();
    for (event, result) in events.iter().zip(results) {
        match result {
            Ok(event_summary) => summary.add(event_summary),
            Err(e) => {
                error!("Event {} failed: {e}", event.start_time);
                summary.events += 1;
                summary.events_failed += 1;
            }
        }
    }

    Ok(summary)
}
