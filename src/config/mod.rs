//! Configuration loading and management.

mod file;
mod paths;
mod settings;
mod types;
mod validate;

pub use file::{load_config_file, load_default_config, save_config};
pub use paths::{config_dir, config_file_path};
pub use settings::{RunSettings, build_run_settings};
pub use types::{Config, ExtractionConfig, PathsConfig, RuntimeConfig, StationKeyMode};
pub use validate::{validate_config, validate_extraction};
