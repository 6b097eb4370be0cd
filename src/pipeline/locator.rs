//! Day-folder listing and station file matching.

use crate::error::{Error, Result};
use crate::pipeline::TimeWindow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Identity of one archive file, parsed from `NET.STA.LOC.CHA.START.<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationFileDescriptor {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Location code (may be empty).
    pub location: String,
    /// Channel code.
    pub channel: String,
    /// File start time token as it appears in the name.
    pub file_start: String,
    /// Full file name.
    pub file_name: String,
}

impl StationFileDescriptor {
    /// Parse an archive file name; `None` if it does not follow the layout.
    pub fn parse(file_name: &str, suffix: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(suffix)?.strip_suffix('.')?;
        let mut parts = stem.splitn(5, '.');
        let network = parts.next()?;
        let station = parts.next()?;
        let location = parts.next()?;
        let channel = parts.next()?;
        let file_start = parts.next()?;

        if network.is_empty() || station.is_empty() || channel.is_empty() {
            return None;
        }

        Some(Self {
            network: network.to_string(),
            station: station.to_string(),
            location: location.to_string(),
            channel: channel.to_string(),
            file_start: file_start.to_string(),
            file_name: file_name.to_string(),
        })
    }

    /// Dotted `NET.STA.LOC.CHA` identifier.
    pub fn id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }

    fn same_stream(&self, other: &Self) -> bool {
        self.network == other.network
            && self.station == other.station
            && self.channel == other.channel
    }
}

/// Parsed contents of one day folder.
#[derive(Debug, Clone)]
pub struct DayListing {
    /// Day folder key (`YYYYMMDD`).
    pub key: String,
    /// Folder path.
    pub dir: PathBuf,
    /// Archive files, sorted by file name.
    pub files: Vec<StationFileDescriptor>,
}

impl DayListing {
    /// Path of a file in this folder.
    pub fn path_of(&self, descriptor: &StationFileDescriptor) -> PathBuf {
        self.dir.join(&descriptor.file_name)
    }

    /// The file in this folder for the same network, station and channel as
    /// `descriptor`, ignoring location and start time.
    ///
    /// With several candidates the one with the same location code wins, otherwise
    /// the first by name; either way a warning is logged.
    pub fn find_stream(
        &self,
        descriptor: &StationFileDescriptor,
    ) -> Option<&StationFileDescriptor> {
        let candidates: Vec<&StationFileDescriptor> = self
            .files
            .iter()
            .filter(|f| f.same_stream(descriptor))
            .collect();

        if candidates.len() > 1 {
            let ambiguity = Error::AmbiguousEndFolderMatch {
                network: descriptor.network.clone(),
                station: descriptor.station.clone(),
                channel: descriptor.channel.clone(),
                count: candidates.len(),
            };
            warn!("{ambiguity} {}", self.key);
        }

        candidates
            .iter()
            .find(|f| f.location == descriptor.location)
            .or_else(|| candidates.first())
            .copied()
    }
}

/// Start and end day listings of one event.
#[derive(Debug, Clone)]
pub struct EventListings {
    /// Listing of the day folder holding the window start.
    pub start: DayListing,
    /// Listing of the day folder holding the window end; `None` for a single-day
    /// window.
    pub end: Option<DayListing>,
}

/// List one day folder. A missing folder yields an empty listing and a warning.
pub fn list_day_folder(archive_root: &Path, key: &str, suffix: &str) -> Result<DayListing> {
    let dir = archive_root.join(key);

    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{}", Error::MissingDayFolder { path: dir.clone() });
            return Ok(DayListing {
                key: key.to_string(),
                dir,
                files: Vec::new(),
            });
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!("Ignoring non-UTF-8 file name in {}", dir.display());
            continue;
        };
        match StationFileDescriptor::parse(name, suffix) {
            Some(descriptor) => files.push(descriptor),
            None => debug!("Ignoring {name}: not an archive file name"),
        }
    }
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(DayListing {
        key: key.to_string(),
        dir,
        files,
    })
}

/// List the day folders of an event window.
///
/// Returns `None` when a cross-day window has an empty listing on either side, in
/// which case no station of the event can be processed.
pub fn locate_event_files(
    archive_root: &Path,
    window: &TimeWindow,
    suffix: &str,
) -> Result<Option<EventListings>> {
    let start = list_day_folder(archive_root, window.start_key(), suffix)?;

    if !window.is_cross_day() {
        return Ok(Some(EventListings { start, end: None }));
    }

    let end = list_day_folder(archive_root, window.end_key(), suffix)?;
    if start.files.is_empty() || end.files.is_empty() {
        warn!(
            "Skipping event at {}: day folders {} and {} must both hold archive files",
            window.utc_start, start.key, end.key
        );
        return Ok(None);
    }

    Ok(Some(EventListings {
        start,
        end: Some(end),
    }))
}
