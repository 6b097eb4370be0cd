//! Event catalog parsing.
//!
//! One event per line, whitespace separated:
//! `start_time latitude longitude depth_km magnitude [ignored...]`.

use crate::error::{Error, Result};
use crate::utils::date::parse_utc;
use chrono::{DateTime, Utc};
use std::path::Path;

/// An earthquake origin from the event catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Origin time; also the start of the extraction window.
    pub start_time: DateTime<Utc>,
    /// Epicentre latitude in degrees.
    pub latitude: f64,
    /// Epicentre longitude in degrees.
    pub longitude: f64,
    /// Hypocentre depth in kilometres.
    pub depth_km: f64,
    /// Magnitude.
    pub magnitude: f64,
}

/// Load the event catalog from a file.
pub fn load_catalog(path: &Path) -> Result<Vec<EventRecord>> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::CatalogRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_catalog(&contents)
}

/// Parse catalog contents. Blank lines and `#` comments are skipped.
pub fn parse_catalog(contents: &str) -> Result<Vec<EventRecord>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(idx, line)| parse_event_line(line, idx + 1))
        .collect()
}

fn parse_event_line(line: &str, line_num: usize) -> Result<EventRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [time, lat, lon, depth, mag, ..] = fields.as_slice() else {
        return Err(Error::InvalidCatalogLine {
            line: line_num,
            message: format!("expected at least 5 columns, found {}", fields.len()),
        });
    };

    let start_time = parse_utc(time).ok_or_else(|| Error::InvalidCatalogLine {
        line: line_num,
        message: format!("unrecognised time '{time}'"),
    })?;

    let number = |name: &str, value: &str| -> Result<f64> {
        value.parse().map_err(|_| Error::InvalidCatalogLine {
            line: line_num,
            message: format!("{name} '{value}' is not a number"),
        })
    };

    Ok(EventRecord {
        start_time,
        latitude: number("latitude", *lat)?,
        longitude: number("longitude", *lon)?,
        depth_km: number("depth", *depth)?,
        magnitude: number("magnitude", *mag)?,
    })
}
