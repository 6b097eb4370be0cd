//! Append-only log of stations missing from the inventory.

use crate::catalog::StationKey;
use crate::constants::MISSED_STATION_LOG;
use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shared log of join misses, one key per line.
///
/// Lines are appended under an exclusive file lock so concurrent workers and
/// concurrent runs sharing the output root never interleave partial lines.
#[derive(Debug, Clone)]
pub struct MissedStationLog {
    path: PathBuf,
}

impl MissedStationLog {
    /// Log at `outputRoot/missed_station.info`.
    pub fn in_output_root(output_root: &Path) -> Self {
        Self {
            path: output_root.join(MISSED_STATION_LOG),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one key.
    pub fn append(&self, key: &StationKey) -> Result<()> {
        let log_error = |e| Error::MissedLogWrite {
            path: self.path.clone(),
            source: e,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(log_error)?;

        file.lock_exclusive().map_err(log_error)?;
        file.write_all(format!("{key}\n").as_bytes())
            .map_err(log_error)?;
        file.flush().map_err(log_error)?;

        // Lock is released when the file is dropped
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StationKeyMode;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_append_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log = MissedStationLog::in_output_root(temp_dir.path());

        log.append(&StationKey::new("JX", "WAA", "BHZ", StationKeyMode::Component))
            .unwrap();
        log.append(&StationKey::new("JX", "WAB", "BHN", StationKeyMode::Component))
            .unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "JX.WAA.Z\nJX.WAB.N\n");
    }

    #[test]
    fn test_concurrent_appends_keep_whole_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log = Arc::new(MissedStationLog::in_output_root(temp_dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        let key = StationKey::new("JX", &format!("S{i}"), "BHZ", StationKeyMode::Component);
                        log.append(&key).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|l| l.starts_with("JX.S") && l.ends_with(".Z")));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let log = MissedStationLog::in_output_root(Path::new("/nonexistent/output"));
        let key = StationKey::new("JX", "WAA", "BHZ", StationKeyMode::Component);
        assert!(matches!(log.append(&key), Err(Error::MissedLogWrite { .. })));
    }
}
