//! Configuration validation.

use crate::config::{Config, ExtractionConfig};
use crate::constants::{CIVIL_OFFSET_RANGE, MAX_DURATION_SECS};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_extraction(&config.extraction)
}

/// Validate extraction settings.
pub fn validate_extraction(extraction: &ExtractionConfig) -> Result<()> {
    if extraction.duration_secs == 0 || extraction.duration_secs > MAX_DURATION_SECS {
        return Err(Error::ConfigValidation {
            message: format!(
                "duration_secs must be between 1 and {MAX_DURATION_SECS}, got {}",
                extraction.duration_secs
            ),
        });
    }

    if !CIVIL_OFFSET_RANGE.contains(&extraction.civil_offset_hours) {
        return Err(Error::ConfigValidation {
            message: format!(
                "civil_offset_hours must be between {} and {}, got {}",
                CIVIL_OFFSET_RANGE.start(),
                CIVIL_OFFSET_RANGE.end(),
                extraction.civil_offset_hours
            ),
        });
    }

    let suffix = extraction.archive_suffix.as_str();
    if suffix.is_empty() || suffix.contains(['.', '/', '\\']) {
        return Err(Error::ConfigValidation {
            message: format!("archive_suffix must be a bare extension, got '{suffix}'"),
        });
    }

    Ok(())
}
