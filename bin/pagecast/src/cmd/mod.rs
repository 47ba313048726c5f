//! CLI command implementations.

pub mod all;
pub mod build;
pub mod publish;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use pagecast_core::Settings;

/// Load settings from `config_path` (if it exists) and the environment.
pub fn load_settings(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        tracing::debug!(?config_path, "settings file not found, using environment only");
    }
    Settings::load(Some(config_path)).wrap_err("Failed to load configuration")
}
