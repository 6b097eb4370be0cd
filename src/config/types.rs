//! Configuration type definitions.

use crate::constants::{DEFAULT_ARCHIVE_SUFFIX, DEFAULT_CIVIL_OFFSET_HOURS, DEFAULT_DURATION_SECS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Event window extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Worker pool settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Input and output locations. Any of these may instead be given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the continuous archive (contains `YYYYMMDD` day folders).
    pub archive_root: Option<PathBuf>,

    /// Event catalog file.
    pub catalog: Option<PathBuf>,

    /// Station inventory file.
    pub stations: Option<PathBuf>,

    /// Root of the output tree.
    pub output_root: Option<PathBuf>,
}

/// Event window extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Window length in seconds after the event start time.
    pub duration_secs: u32,

    /// Offset from UTC, in hours, of the civil day used to name archive folders.
    pub civil_offset_hours: i32,

    /// Archive file extension (without the dot).
    pub archive_suffix: String,

    /// Granularity of the station inventory join key.
    pub station_key: StationKeyMode,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            civil_offset_hours: DEFAULT_CIVIL_OFFSET_HOURS,
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_string(),
            station_key: StationKeyMode::default(),
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Number of worker threads (0 = host parallelism).
    pub workers: usize,

    /// Seconds after which any station lock is treated as abandoned.
    pub stale_lock_timeout_secs: Option<u64>,
}

/// How channel codes are reduced when joining traces to the station inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationKeyMode {
    /// Last letter of the channel code (`BHZ` and `HHZ` share `Z`).
    #[default]
    Component,
    /// Full channel code.
    Channel,
}

impl std::fmt::Display for StationKeyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component => write!(f, "component"),
            Self::Channel => write!(f, "channel"),
        }
    }
}

impl std::str::FromStr for StationKeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "component" | "letter" => Ok(Self::Component),
            "channel" | "full" => Ok(Self::Channel),
            other => Err(format!("unknown station key mode: {other}")),
        }
    }
}
