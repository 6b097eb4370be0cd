//! Output record writers.

use crate::error::{Error, Result};
use crate::output::OutputRecord;
use crate::sac::write_sac;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::debug;

/// Persists enriched records.
pub trait RecordWriter: Send + Sync {
    /// Write `record`, creating its directory if needed, and return the written path.
    ///
    /// An existing file at the destination is overwritten.
    fn write_record(&self, record: &OutputRecord) -> Result<PathBuf>;
}

/// Writes little-endian SAC files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SacWriter;

impl RecordWriter for SacWriter {
    fn write_record(&self, record: &OutputRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&record.directory).map_err(|e| Error::OutputDirCreateFailed {
            path: record.directory.clone(),
            source: e,
        })?;

        let path = record.path();
        let write_failure = |e| Error::WriteFailure {
            path: path.clone(),
            source: e,
        };

        let file = File::create(&path).map_err(write_failure)?;
        let mut writer = BufWriter::new(file);
        write_sac(&mut writer, &record.header, &record.samples).map_err(write_failure)?;

        debug!("Wrote {} samples to {}", record.samples.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::sac::HEADER_LEN;
    use crate::sac::SacHeader;
    use tempfile::TempDir;

    fn record(dir: PathBuf, samples: Vec<f32>) -> OutputRecord {
        OutputRecord {
            directory: dir,
            file_name: "2016.122.00.00.04.0000.JX.WAA.00.BHZ.M.SAC".to_string(),
            header: SacHeader::default(),
            samples,
        }
    }

    #[test]
    fn test_write_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("20160501000004");
        let path = SacWriter.write_record(&record(dir.clone(), vec![0.0; 5])).unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), (HEADER_LEN + 20) as u64);
    }

    #[test]
    fn test_existing_directory_and_file_are_fine() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("20160501000004");
        SacWriter.write_record(&record(dir.clone(), vec![0.0; 5])).unwrap();
        let path = SacWriter.write_record(&record(dir, vec![0.0; 2])).unwrap();

        // Overwritten in place.
        assert_eq!(std::fs::metadata(&path).unwrap().len(), (HEADER_LEN + 8) as u64);
    }

    #[test]
    fn test_unwritable_directory() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let result = SacWriter.write_record(&record(blocker.join("sub"), vec![]));
        assert!(matches!(result, Err(Error::OutputDirCreateFailed { .. })));
    }
}
