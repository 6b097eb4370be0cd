//! Run settings resolution.

use crate::cli::RunArgs;
use crate::config::types::{Config, ExtractionConfig};
use crate::config::validate_extraction;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fully resolved settings for one extraction run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Root of the continuous archive.
    pub archive_root: PathBuf,
    /// Event catalog file.
    pub catalog: PathBuf,
    /// Station inventory file.
    pub stations: PathBuf,
    /// Root of the output tree.
    pub output_root: PathBuf,
    /// Extraction settings.
    pub extraction: ExtractionConfig,
    /// Worker threads (0 = host parallelism).
    pub workers: usize,
    /// Reprocess stations whose output already exists.
    pub force: bool,
    /// Age after which any station lock is treated as abandoned.
    pub stale_lock_timeout: Option<Duration>,
}

/// Build `RunSettings` from CLI args and config file.
///
/// Command-line values (and their environment variables) override the config file,
/// which overrides built-in defaults.
pub fn build_run_settings(args: &RunArgs, config: &Config) -> Result<RunSettings> {
    let paths = &config.paths;

    let archive_root = required(
        args.archive_root.as_deref(),
        paths.archive_root.as_deref(),
        "archive_root",
        "archive-root",
    )?;
    let catalog = required(
        args.catalog.as_deref(),
        paths.catalog.as_deref(),
        "catalog",
        "catalog",
    )?;
    let stations = required(
        args.stations.as_deref(),
        paths.stations.as_deref(),
        "stations",
        "stations",
    )?;
    let output_root = required(
        args.output_root.as_deref(),
        paths.output_root.as_deref(),
        "output_root",
        "output-root",
    )?;

    let mut extraction = config.extraction.clone();
    if let Some(duration) = args.duration {
        extraction.duration_secs = duration;
    }
    if let Some(mode) = args.station_key {
        extraction.station_key = mode;
    }
    validate_extraction(&extraction)?;

    Ok(RunSettings {
        archive_root,
        catalog,
        stations,
        output_root,
        extraction,
        workers: args.workers.unwrap_or(config.runtime.workers),
        force: args.force,
        stale_lock_timeout: args.stale_lock_timeout.or_else(|| {
            config
                .runtime
                .stale_lock_timeout_secs
                .map(Duration::from_secs)
        }),
    })
}

fn required(
    cli: Option<&Path>,
    file: Option<&Path>,
    name: &'static str,
    flag: &'static str,
) -> Result<PathBuf> {
    cli.or(file)
        .map(Path::to_path_buf)
        .ok_or(Error::MissingSetting { name, flag })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StationKeyMode;

    fn create_run_args() -> RunArgs {
        RunArgs {
            archive_root: None,
            catalog: None,
            stations: None,
            output_root: None,
            duration: None,
            workers: None,
            station_key: None,
            stale_lock_timeout: None,
            config: None,
            force: false,
            quiet: false,
            verbose: 0,
            no_progress: false,
        }
    }

    fn config_with_paths() -> Config {
        let mut config = Config::default();
        config.paths.archive_root = Some("/archive".into());
        config.paths.catalog = Some("/events.csv".into());
        config.paths.stations = Some("/station.all.info".into());
        config.paths.output_root = Some("/out".into());
        config
    }

    #[test]
    fn test_settings_from_config_only() {
        let settings = build_run_settings(&create_run_args(), &config_with_paths()).unwrap();
        assert_eq!(settings.archive_root, PathBuf::from("/archive"));
        assert_eq!(settings.catalog, PathBuf::from("/events.csv"));
        assert_eq!(settings.extraction.duration_secs, 6000);
        assert_eq!(settings.workers, 0);
        assert!(!settings.force);
        assert!(settings.stale_lock_timeout.is_none());
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut args = create_run_args();
        args.output_root = Some("/elsewhere".into());
        args.duration = Some(1200);
        args.workers = Some(3);
        args.station_key = Some(StationKeyMode::Channel);
        args.force = true;

        let settings = build_run_settings(&args, &config_with_paths()).unwrap();
        assert_eq!(settings.output_root, PathBuf::from("/elsewhere"));
        assert_eq!(settings.extraction.duration_secs, 1200);
        assert_eq!(settings.extraction.station_key, StationKeyMode::Channel);
        assert_eq!(settings.workers, 3);
        assert!(settings.force);
    }

    #[test]
    fn test_stale_lock_timeout_from_config_and_cli() {
        let mut config = config_with_paths();
        config.runtime.stale_lock_timeout_secs = Some(3600);
        let settings = build_run_settings(&create_run_args(), &config).unwrap();
        assert_eq!(settings.stale_lock_timeout, Some(Duration::from_secs(3600)));

        let mut args = create_run_args();
        args.stale_lock_timeout = Some(Duration::from_secs(60));
        let settings = build_run_settings(&args, &config).unwrap();
        assert_eq!(settings.stale_lock_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_missing_path_is_reported() {
        let mut config = config_with_paths();
        config.paths.stations = None;

        let result = build_run_settings(&create_run_args(), &config);
        assert!(matches!(
            result,
            Err(Error::MissingSetting {
                name: "stations",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_config_extraction_is_rejected() {
        let mut config = config_with_paths();
        config.extraction.civil_offset_hours = 30;

        let result = build_run_settings(&create_run_args(), &config);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }
}
