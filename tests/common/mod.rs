//! Synthetic archive builders shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use seistrim::config::{ExtractionConfig, RunSettings};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Samples per 512-byte INT32 record with a 64-byte header.
const SAMPLES_PER_RECORD: usize = 112;

/// Encode `values` as big-endian INT32 miniSEED records at an integer rate.
pub fn mseed_bytes(
    network: &str,
    station: &str,
    location: &str,
    channel: &str,
    start: DateTime<Utc>,
    rate_hz: i16,
    values: &[i32],
) -> Vec<u8> {
    let mut out = Vec::new();
    for (idx, chunk) in values.chunks(SAMPLES_PER_RECORD).enumerate() {
        let offset_samples = i64::try_from(idx * SAMPLES_PER_RECORD).unwrap();
        let nanos = offset_samples * 1_000_000_000 / i64::from(rate_hz);
        let rec_start = start + TimeDelta::nanoseconds(nanos);
        out.extend(record(
            idx + 1,
            [network, station, location, channel],
            rec_start,
            rate_hz,
            chunk,
        ));
    }
    out
}

fn record(
    sequence: usize,
    [network, station, location, channel]: [&str; 4],
    start: DateTime<Utc>,
    rate_hz: i16,
    values: &[i32],
) -> Vec<u8> {
    let mut rec = vec![0_u8; 512];
    rec[0..6].copy_from_slice(format!("{sequence:06}").as_bytes());
    rec[6] = b'D';
    rec[7] = b' ';
    put_text(&mut rec[8..13], station);
    put_text(&mut rec[13..15], location);
    put_text(&mut rec[15..18], channel);
    put_text(&mut rec[18..20], network);

    let year = u16::try_from(start.year()).unwrap();
    let day = u16::try_from(start.ordinal()).unwrap();
    let fract = u16::try_from(start.nanosecond() / 100_000).unwrap();
    rec[20..22].copy_from_slice(&year.to_be_bytes());
    rec[22..24].copy_from_slice(&day.to_be_bytes());
    rec[24] = u8::try_from(start.hour()).unwrap();
    rec[25] = u8::try_from(start.minute()).unwrap();
    rec[26] = u8::try_from(start.second()).unwrap();
    rec[28..30].copy_from_slice(&fract.to_be_bytes());

    rec[30..32].copy_from_slice(&u16::try_from(values.len()).unwrap().to_be_bytes());
    rec[32..34].copy_from_slice(&rate_hz.to_be_bytes());
    rec[34..36].copy_from_slice(&1_i16.to_be_bytes());
    rec[39] = 1;
    rec[44..46].copy_from_slice(&64_u16.to_be_bytes());
    rec[46..48].copy_from_slice(&48_u16.to_be_bytes());

    // Blockette 1000: INT32, big-endian, 512-byte records.
    rec[48..50].copy_from_slice(&1000_u16.to_be_bytes());
    rec[52] = 3;
    rec[53] = 1;
    rec[54] = 9;

    for (i, value) in values.iter().enumerate() {
        rec[64 + i * 4..68 + i * 4].copy_from_slice(&value.to_be_bytes());
    }
    rec
}

fn put_text(slot: &mut [u8], text: &str) {
    slot.fill(b' ');
    slot[..text.len()].copy_from_slice(text.as_bytes());
}

/// A temporary archive, catalog, inventory and output root.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(fixture.archive_root()).unwrap();
        fixture
    }

    pub fn archive_root(&self) -> PathBuf {
        self.dir.path().join("archive")
    }

    pub fn output_root(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("events.txt")
    }

    pub fn stations_path(&self) -> PathBuf {
        self.dir.path().join("station.all.info")
    }

    pub fn write_catalog(&self, lines: &[&str]) {
        fs::write(self.catalog_path(), lines.join("\n") + "\n").unwrap();
    }

    pub fn write_stations(&self, lines: &[&str]) {
        fs::write(self.stations_path(), lines.join("\n") + "\n").unwrap();
    }

    /// Write one archive file of 1 Hz data into a day folder.
    pub fn write_archive(
        &self,
        day: &str,
        nslc: [&str; 4],
        file_start: &str,
        start: DateTime<Utc>,
        values: &[i32],
    ) -> PathBuf {
        let [network, station, location, channel] = nslc;
        let dir = self.archive_root().join(day);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!(
            "{network}.{station}.{location}.{channel}.{file_start}.mseed"
        ));
        fs::write(
            &path,
            mseed_bytes(network, station, location, channel, start, 1, values),
        )
        .unwrap();
        path
    }

    pub fn settings(&self) -> RunSettings {
        RunSettings {
            archive_root: self.archive_root(),
            catalog: self.catalog_path(),
            stations: self.stations_path(),
            output_root: self.output_root(),
            extraction: ExtractionConfig::default(),
            workers: 2,
            force: false,
            stale_lock_timeout: None,
        }
    }

    /// All SAC files under the output root, relative to it, sorted.
    pub fn outputs(&self) -> Vec<String> {
        let mut found = Vec::new();
        collect(&self.output_root(), &self.output_root(), &mut found);
        found.sort();
        found
    }
}

fn collect(root: &Path, dir: &Path, found: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, found);
        } else if path.extension().is_some_and(|e| e == "SAC") {
            found.push(
                path.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/"),
            );
        }
    }
}

/// Values `first, first + 1, ...`.
pub fn ramp(first: i32, len: usize) -> Vec<i32> {
    (0..len).map(|i| first + i32::try_from(i).unwrap()).collect()
}
