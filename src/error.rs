//! Error types for seistrim.

use std::path::PathBuf;

/// Result type alias for seistrim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for seistrim.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A required path setting was given neither on the command line nor in the config.
    #[error("no {name} configured (use --{flag} or set paths.{name} in config)")]
    MissingSetting {
        /// Config key name.
        name: &'static str,
        /// CLI flag name.
        flag: &'static str,
    },

    /// Failed to read the event catalog.
    #[error("failed to read event catalog '{path}'")]
    CatalogRead {
        /// Path to the catalog file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Event catalog line could not be parsed.
    #[error("invalid event catalog line {line}: {message}")]
    InvalidCatalogLine {
        /// One-based line number.
        line: usize,
        /// Description of the format error.
        message: String,
    },

    /// Station inventory file does not exist.
    #[error("station inventory file does not exist: {path}")]
    StationInventoryNotFound {
        /// Path to the missing inventory.
        path: PathBuf,
    },

    /// Failed to read the station inventory.
    #[error("failed to read station inventory '{path}'")]
    StationInventoryRead {
        /// Path to the inventory file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Station inventory line could not be parsed.
    #[error("invalid station inventory line {line}: {message}")]
    InvalidStationLine {
        /// One-based line number.
        line: usize,
        /// Description of the format error.
        message: String,
    },

    /// miniSEED record could not be decoded.
    #[error("failed to decode miniSEED record {record} in '{path}': {reason}")]
    SeedDecode {
        /// Path to the archive file.
        path: PathBuf,
        /// Zero-based record index within the file.
        record: usize,
        /// Description of the decoding failure.
        reason: String,
    },

    /// Day folder for a window does not exist in the archive.
    #[error("day folder does not exist: {path}")]
    MissingDayFolder {
        /// Path to the missing folder.
        path: PathBuf,
    },

    /// Archive file for a station is missing.
    #[error("archive file does not exist: {path}")]
    MissingArchiveFile {
        /// Expected archive file path.
        path: PathBuf,
    },

    /// No archive file for a station was found in the end day folder.
    #[error("no archive file for {network}.{station}.{channel} in end day folder {folder}")]
    MissingEndFolderFile {
        /// Network code.
        network: String,
        /// Station code.
        station: String,
        /// Channel code.
        channel: String,
        /// Day folder key.
        folder: String,
    },

    /// The time-constrained read returned no samples.
    #[error("no samples inside the event window in '{path}'")]
    EmptyReadResult {
        /// Archive file path.
        path: PathBuf,
    },

    /// Several end-folder files match a station; one was picked.
    #[error("{count} archive files match {network}.{station}.{channel} in end day folder")]
    AmbiguousEndFolderMatch {
        /// Network code.
        network: String,
        /// Station code.
        station: String,
        /// Channel code.
        channel: String,
        /// Number of candidates.
        count: usize,
    },

    /// Segments could not be merged because their sample rates differ.
    #[error("sample rate mismatch for {id}: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch {
        /// Stream identifier.
        id: String,
        /// Sample rate of the first segment.
        expected: f64,
        /// Sample rate of the offending segment.
        actual: f64,
    },

    /// A read segment lies implausibly far outside the event window.
    #[error("segment of {id} starting {start} lies more than a day outside the event window")]
    SegmentOutsideWindow {
        /// Stream identifier.
        id: String,
        /// Start time of the offending segment.
        start: chrono::DateTime<chrono::Utc>,
    },

    /// Merging the read segments produced no samples.
    #[error("merge produced no data for {id}")]
    MergeProducedNoData {
        /// Stream identifier.
        id: String,
    },

    /// Station has no entry in the station inventory.
    #[error("no station metadata for {key}")]
    MissingStationMetadata {
        /// Join key that was looked up.
        key: String,
    },

    /// Writing the output record failed.
    #[error("failed to write output record '{path}'")]
    WriteFailure {
        /// Path to the output record.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to append to the missed-station log.
    #[error("failed to append to missed-station log '{path}'")]
    MissedLogWrite {
        /// Path to the log.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Output pattern could not be compiled.
    #[error("invalid output pattern '{pattern}'")]
    OutputPattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },

    /// Station is locked by another process.
    #[error("station is locked by another process: {path}")]
    StationLocked {
        /// Path to the lock file.
        path: PathBuf,
    },

    /// Failed to create lock file.
    #[error("failed to create lock file '{path}'")]
    LockCreate {
        /// Path to the lock file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a stale lock file.
    #[error("failed to remove stale lock '{path}'")]
    LockRemove {
        /// Path to the lock file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to build the worker pool.
    #[error("failed to build worker pool: {reason}")]
    WorkerPool {
        /// Description of the build failure.
        reason: String,
    },
}

impl Error {
    /// Whether this error ends processing of a single station without affecting the
    /// rest of the event.
    pub const fn is_station_skip(&self) -> bool {
        matches!(
            self,
            Self::MissingArchiveFile { .. }
                | Self::MissingEndFolderFile { .. }
                | Self::EmptyReadResult { .. }
                | Self::SampleRateMismatch { .. }
                | Self::SegmentOutsideWindow { .. }
                | Self::MergeProducedNoData { .. }
                | Self::MissingStationMetadata { .. }
                | Self::WriteFailure { .. }
                | Self::SeedDecode { .. }
                | Self::StationLocked { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_skips_are_classified() {
        let skip = Error::MissingStationMetadata {
            key: "JX.WAA.Z".to_string(),
        };
        assert!(skip.is_station_skip());

        let fatal = Error::Io(std::io::Error::other("device full"));
        assert!(!fatal.is_station_skip());
    }

    #[test]
    fn test_missing_setting_message_names_flag() {
        let err = Error::MissingSetting {
            name: "catalog",
            flag: "catalog",
        };
        assert!(err.to_string().contains("--catalog"));
    }
}
