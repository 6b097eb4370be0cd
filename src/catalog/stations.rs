//! Station inventory parsing and lookup.
//!
//! Each line starts with a dot-delimited identifier whose last four segments are
//! `network.station.location.channel`, and ends with six numeric columns:
//! `stla stlo stel stdp cmpaz cmpinc`.

use crate::config::StationKeyMode;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Join key between traces and the station inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationKey {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Component letter or full channel code, depending on the key mode.
    pub component: String,
}

impl StationKey {
    /// Build a key from a full channel code.
    pub fn new(network: &str, station: &str, channel: &str, mode: StationKeyMode) -> Self {
        let component = match mode {
            StationKeyMode::Component => channel
                .chars()
                .last()
                .map(String::from)
                .unwrap_or_default(),
            StationKeyMode::Channel => channel.to_string(),
        };
        Self {
            network: network.to_string(),
            station: station.to_string(),
            component,
        }
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.network, self.station, self.component)
    }
}

/// Sensor metadata for one station component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationRecord {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Elevation in metres.
    pub elevation: f64,
    /// Burial depth in metres.
    pub depth: f64,
    /// Component azimuth in degrees from north.
    pub azimuth: f64,
    /// Component inclination in degrees from vertical.
    pub inclination: f64,
}

/// Read-only station metadata table.
#[derive(Debug, Clone)]
pub struct StationInventory {
    mode: StationKeyMode,
    stations: HashMap<StationKey, StationRecord>,
}

impl StationInventory {
    /// Parse inventory contents. Later lines replace earlier lines with the same key.
    pub fn parse(contents: &str, mode: StationKeyMode) -> Result<Self> {
        let mut stations = HashMap::new();

        for (idx, line) in contents.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (key, record) = parse_station_line(trimmed, idx + 1, mode)?;
            if stations.insert(key.clone(), record).is_some() {
                debug!("Station key {key} redefined on line {}", idx + 1);
            }
        }

        Ok(Self { mode, stations })
    }

    /// Load the inventory from a file.
    pub fn load(path: &Path, mode: StationKeyMode) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::StationInventoryRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents, mode)
    }

    /// Key mode used to build this inventory.
    pub const fn mode(&self) -> StationKeyMode {
        self.mode
    }

    /// Build the join key for a trace identity using this inventory's key mode.
    pub fn key_for(&self, network: &str, station: &str, channel: &str) -> StationKey {
        StationKey::new(network, station, channel, self.mode)
    }

    /// Look up station metadata.
    pub fn get(&self, key: &StationKey) -> Option<&StationRecord> {
        self.stations.get(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the inventory has no entries.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

fn parse_station_line(
    line: &str,
    line_num: usize,
    mode: StationKeyMode,
) -> Result<(StationKey, StationRecord)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 7 {
        return Err(Error::InvalidStationLine {
            line: line_num,
            message: format!("expected an identifier and 6 values, found {} columns", fields.len()),
        });
    }

    let id_parts: Vec<&str> = fields[0].split('.').collect();
    let [.., network, station, _location, channel] = id_parts.as_slice() else {
        return Err(Error::InvalidStationLine {
            line: line_num,
            message: format!("identifier '{}' is not NET.STA.LOC.CHA", fields[0]),
        });
    };

    let mut values = [0.0_f64; 6];
    for (slot, raw) in values.iter_mut().zip(&fields[fields.len() - 6..]) {
        *slot = raw.parse().map_err(|_| Error::InvalidStationLine {
            line: line_num,
            message: format!("'{raw}' is not a number"),
        })?;
    }
    let [latitude, longitude, elevation, depth, azimuth, inclination] = values;

    Ok((
        StationKey::new(network, station, channel, mode),
        StationRecord {
            latitude,
            longitude,
            elevation,
            depth,
            azimuth,
            inclination,
        },
    ))
}

/// Resolve the inventory path, asking for another one on a terminal if it is missing.
pub fn resolve_inventory_path(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    warn!("Station inventory not found: {}", path.display());

    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return Err(Error::StationInventoryNotFound {
            path: path.to_path_buf(),
        });
    }

    print!("Please input station inventory location: ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    stdin.lock().read_line(&mut input)?;

    let entered = PathBuf::from(input.trim());
    if entered.is_file() {
        Ok(entered)
    } else {
        Err(Error::StationInventoryNotFound { path: entered })
    }
}
