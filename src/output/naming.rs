//! Deterministic output paths.

use crate::catalog::StationKey;
use crate::constants::output_name::{LOCATION, MILLISECOND, QUALITY, SUFFIX};
use crate::utils::date::event_folder_name;
use chrono::{DateTime, Utc};
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Event sub-folder `outputRoot/YYYYMMDDHHMMSS`.
pub fn event_dir(output_root: &Path, utc_start: &DateTime<Utc>) -> PathBuf {
    output_root.join(event_folder_name(utc_start))
}

/// Record file name `YYYY.JJJ.HH.MM.SS.0000.NET.STA.00.CHA.M.SAC`.
///
/// The location field is always `00` regardless of the archive location code.
pub fn record_file_name(
    utc_start: &DateTime<Utc>,
    network: &str,
    station: &str,
    channel: &str,
) -> String {
    format!(
        "{}.{MILLISECOND}.{network}.{station}.{LOCATION}.{channel}.{QUALITY}.{SUFFIX}",
        utc_start.format("%Y.%j.%H.%M.%S")
    )
}

/// Glob matching any record in `event_dir` for the station key.
///
/// The key's component is matched as a suffix of the channel, so both key modes work.
pub fn station_glob(event_dir: &Path, key: &StationKey) -> String {
    let name = format!(
        "*.{}.{}.*{}.{QUALITY}.{SUFFIX}",
        Pattern::escape(&key.network),
        Pattern::escape(&key.station),
        Pattern::escape(&key.component)
    );
    format!(
        "{}/{name}",
        Pattern::escape(&event_dir.to_string_lossy())
    )
}
