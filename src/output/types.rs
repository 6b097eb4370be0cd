//! Output type definitions.

use crate::sac::SacHeader;
use std::path::PathBuf;

/// One enriched trace ready to be written.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    /// Event sub-folder the record is written into.
    pub directory: PathBuf,
    /// File name inside `directory`.
    pub file_name: String,
    /// Complete record header.
    pub header: SacHeader,
    /// Trace samples.
    pub samples: Vec<f32>,
}

impl OutputRecord {
    /// Full destination path.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}
