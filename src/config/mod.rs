//! Configuration management for venbluez.
//!
//! This module handles loading the application configuration from a TOML file
//! in the user's config directory, or from an explicit `--config` path.

pub mod file;

pub use file::{default_config_path, RecorderConfig, SourceConfig, VenbluezConfig};
#[cfg(test)]
pub use file::ToolsConfig;

use crate::error::VenbluezError;
use std::path::Path;

/// Loads the configuration for this run.
///
/// An explicit path must exist. Without one, the default file is used and
/// written from the embedded template first if it is missing.
///
/// # Errors
/// - If the config file cannot be created, read or parsed
pub fn load(explicit: Option<&Path>) -> Result<VenbluezConfig, VenbluezError> {
    if let Some(path) = explicit {
        tracing::debug!("Loading configuration from {}", path.display());
        return VenbluezConfig::load_from(path);
    }

    let path = default_config_path()?;
    if !path.exists() {
        tracing::info!("No configuration found, writing defaults to {}", path.display());
        crate::setup::run_setup(&path)?;
    }
    VenbluezConfig::load_from(&path)
}
