//! First-run setup.
//!
//! Writes the embedded default configuration when no config file exists yet.

use crate::error::VenbluezError;
use std::path::Path;

/// Embedded default configuration template.
pub const DEFAULT_CONFIG: &str = include_str!("../../environments/venbluez.toml");

/// Creates the config directory and writes the default config file.
///
/// # Errors
/// Returns an error if any file operations fail.
pub fn run_setup(config_path: &Path) -> Result<(), VenbluezError> {
    if let Some(config_dir) = config_path.parent() {
        std::fs::create_dir_all(config_dir)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    tracing::info!("Default configuration written to {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VenbluezConfig;
    use tempfile::tempdir;

    #[test]
    fn embedded_template_matches_defaults() {
        let config = VenbluezConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, VenbluezConfig::default());
    }

    #[test]
    fn run_setup_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".config").join("venbluez").join("venbluez.toml");

        run_setup(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
    }
}
