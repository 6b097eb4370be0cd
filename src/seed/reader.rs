//! Time-constrained reading of miniSEED files.

use super::decode::decode_samples;
use super::record::{RecordHeader, parse_header};
use crate::constants::seed::{FIXED_HEADER_LEN, encoding};
use crate::error::{Error, Result};
use crate::utils::date::nanos_between;
use crate::waveform::{Segment, sample_offset};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, trace};

/// Read every record of `path` and keep the samples inside `[start, end]`.
///
/// Either bound may be open. Records without a time series (ASCII logs, zero rate or
/// zero samples) are skipped. One segment is returned per record that contributes
/// samples, in file order.
pub fn read_segments(
    path: &Path,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<Vec<Segment>> {
    let bytes = std::fs::read(path)?;
    let decode_error = |record: usize, reason: String| Error::SeedDecode {
        path: path.to_path_buf(),
        record,
        reason,
    };

    let mut segments = Vec::new();
    let mut offset = 0;
    let mut record_idx = 0;

    while offset + FIXED_HEADER_LEN <= bytes.len() {
        let header = parse_header(&bytes[offset..]).map_err(|r| decode_error(record_idx, r))?;
        let record_end = offset + header.record_len;
        if record_end > bytes.len() {
            return Err(decode_error(
                record_idx,
                format!(
                    "record of {} bytes truncated at end of file",
                    header.record_len
                ),
            ));
        }

        if let Some(segment) = read_record(&header, &bytes[offset..record_end], start, end)
            .map_err(|r| decode_error(record_idx, r))?
        {
            segments.push(segment);
        }

        offset = record_end;
        record_idx += 1;
    }

    debug!(
        "Read {} segment(s) from {} record(s) in {}",
        segments.len(),
        record_idx,
        path.display()
    );
    Ok(segments)
}

fn read_record(
    header: &RecordHeader,
    record: &[u8],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> std::result::Result<Option<Segment>, String> {
    if header.sample_count == 0 || header.sample_rate <= 0.0 || header.encoding == encoding::ASCII
    {
        trace!("Skipping record without time series at {}", header.start);
        return Ok(None);
    }

    let last_index = header.sample_count - 1;
    let record_last = header.start + sample_offset(last_index, header.sample_rate);
    if start.is_some_and(|s| record_last < s) || end.is_some_and(|e| header.start > e) {
        return Ok(None);
    }

    let samples = decode_samples(
        &record[header.data_offset..],
        header.encoding,
        header.data_order,
        header.sample_count,
    )?;

    let first = start.map_or(0, |s| first_index_at_or_after(header, s));
    let last = end.map_or(last_index, |e| last_index_at_or_before(header, e));
    if first > last {
        return Ok(None);
    }

    Ok(Some(Segment {
        network: header.network.clone(),
        station: header.station.clone(),
        location: header.location.clone(),
        channel: header.channel.clone(),
        start: header.start + sample_offset(first, header.sample_rate),
        sample_rate: header.sample_rate,
        samples: samples[first..=last].to_vec(),
    }))
}

/// Smallest sample index whose time is not before `instant`.
fn first_index_at_or_after(header: &RecordHeader, instant: DateTime<Utc>) -> usize {
    let target = nanos_between(&header.start, &instant);
    if target <= 0 {
        return 0;
    }
    let offset_ns = |i: usize| {
        sample_offset(i, header.sample_rate)
            .num_nanoseconds()
            .unwrap_or(i64::MAX)
    };
    let mut idx = estimate_index(target, header.sample_rate);
    while idx > 0 && offset_ns(idx - 1) >= target {
        idx -= 1;
    }
    while offset_ns(idx) < target {
        idx += 1;
    }
    idx
}

/// Largest sample index whose time is not after `instant`, clamped to the record.
fn last_index_at_or_before(header: &RecordHeader, instant: DateTime<Utc>) -> usize {
    let last_index = header.sample_count - 1;
    let target = nanos_between(&header.start, &instant);
    if target < 0 {
        // Caller guarantees the first sample is inside the window.
        return 0;
    }
    let offset_ns = |i: usize| {
        sample_offset(i, header.sample_rate)
            .num_nanoseconds()
            .unwrap_or(i64::MAX)
    };
    let mut idx = estimate_index(target, header.sample_rate).min(last_index);
    while idx < last_index && offset_ns(idx + 1) <= target {
        idx += 1;
    }
    while idx > 0 && offset_ns(idx) > target {
        idx -= 1;
    }
    idx
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn estimate_index(target_ns: i64, sample_rate: f64) -> usize {
    (target_ns as f64 * sample_rate / 1e9).floor().max(0.0) as usize
}
