//! Single station processing: trim, merge, enrich and write.

use crate::catalog::EventRecord;
use crate::constants::MAX_SEGMENT_DRIFT_SECS;
use crate::error::{Error, Result};
use crate::locking::StationLock;
use crate::output::{OutputRecord, record_file_name};
use crate::pipeline::enrich::build_header;
use crate::pipeline::locator::{EventListings, StationFileDescriptor};
use crate::pipeline::{RunContext, TimeWindow};
use crate::seed::read_segments;
use crate::waveform::{Segment, merge_segments};
use chrono::TimeDelta;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Result of processing one station.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the written record.
    pub path: PathBuf,
    /// Samples in the written trace.
    pub samples: usize,
    /// Zero-filled gap samples in the written trace.
    pub gap_samples: usize,
}

/// Extract one station of one event and write its record.
///
/// Every error in [`Error::is_station_skip`] ends only this station. A station
/// missing from the inventory is appended to the missed-station log first.
pub fn process_station(
    context: &RunContext,
    event: &EventRecord,
    window: &TimeWindow,
    listings: &EventListings,
    descriptor: &StationFileDescriptor,
    event_dir: &Path,
) -> Result<ProcessResult> {
    let key = context.inventory.key_for(
        &descriptor.network,
        &descriptor.station,
        &descriptor.channel,
    );

    let _lock = StationLock::acquire(event_dir, &key)?;

    let segments = read_window(window, listings, descriptor)?;
    check_segment_span(&segments, window)?;
    let merged = merge_segments(&segments).ok_or_else(|| Error::MergeProducedNoData {
        id: descriptor.id(),
    })?;

    let Some(station) = context.inventory.get(&key) else {
        if let Err(e) = context.missed_log.append(&key) {
            error!("{e}");
        }
        return Err(Error::MissingStationMetadata {
            key: key.to_string(),
        });
    };

    let record = OutputRecord {
        directory: event_dir.to_path_buf(),
        file_name: record_file_name(
            &window.utc_start,
            &descriptor.network,
            &descriptor.station,
            &descriptor.channel,
        ),
        header: build_header(&merged.trace, station, event, &window.utc_start),
        samples: merged.trace.samples,
    };
    let path = context.writer.write_record(&record)?;

    Ok(ProcessResult {
        path,
        samples: record.samples.len(),
        gap_samples: merged.gap_samples,
    })
}

/// Read the station's samples inside the window from one or two day folders.
fn read_window(
    window: &TimeWindow,
    listings: &EventListings,
    descriptor: &StationFileDescriptor,
) -> Result<Vec<Segment>> {
    let first_path = existing_file(listings.start.path_of(descriptor))?;

    let Some(end_listing) = &listings.end else {
        let segments = read_segments(&first_path, Some(window.utc_start), Some(window.utc_end))?;
        if segments.is_empty() {
            return Err(Error::EmptyReadResult { path: first_path });
        }
        return Ok(segments);
    };

    let second = end_listing
        .find_stream(descriptor)
        .ok_or_else(|| Error::MissingEndFolderFile {
            network: descriptor.network.clone(),
            station: descriptor.station.clone(),
            channel: descriptor.channel.clone(),
            folder: end_listing.key.clone(),
        })?;
    let second_path = existing_file(end_listing.path_of(second))?;

    let mut segments = read_segments(&first_path, Some(window.utc_start), None)?;
    let tail = read_segments(&second_path, None, Some(window.utc_end))?;
    debug!(
        "{}: {} segment(s) from {}, {} from {}",
        descriptor.id(),
        segments.len(),
        listings.start.key,
        tail.len(),
        end_listing.key
    );
    segments.extend(tail);

    if segments.is_empty() {
        return Err(Error::EmptyReadResult { path: first_path });
    }
    Ok(segments)
}

fn existing_file(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::MissingArchiveFile { path })
    }
}

/// Reject segments reaching more than [`MAX_SEGMENT_DRIFT_SECS`] past either end of
/// the window.
pub(crate) fn check_segment_span(segments: &[Segment], window: &TimeWindow) -> Result<()> {
    let drift = TimeDelta::seconds(MAX_SEGMENT_DRIFT_SECS);
    let earliest = window.utc_start - drift;
    let latest = window.utc_end + drift;

    match segments
        .iter()
        .find(|s| s.start < earliest || s.end() > latest)
    {
        Some(segment) => Err(Error::SegmentOutsideWindow {
            id: segment.id(),
            start: segment.start,
        }),
        None => Ok(()),
    }
}
