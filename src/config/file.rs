//! Configuration file management for venbluez.
//!
//! This module handles loading the application configuration from a TOML file.
//! Every field has a default, so a partial or empty file is valid.

use crate::error::VenbluezError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Names (or absolute paths) of the external programs the pipeline drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Link-layer reachability probe
    pub l2ping: String,
    /// Interactive pairing agent
    pub bluetoothctl: String,
    /// Audio server query tool
    pub pactl: String,
    /// Audio recorder
    pub parecord: String,
    /// Privilege elevation for the probe
    pub sudo: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            l2ping: "l2ping".to_string(),
            bluetoothctl: "bluetoothctl".to_string(),
            pactl: "pactl".to_string(),
            parecord: "parecord".to_string(),
            sudo: "sudo".to_string(),
        }
    }
}

/// Reachability probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Run the probe through `sudo`
    pub use_sudo: bool,
    /// Number of echo requests to send
    pub count: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            use_sudo: true,
            count: 1,
        }
    }
}

impl ProbeConfig {
    /// Text l2ping prints when every echo request went out.
    pub fn success_marker(&self) -> String {
        format!("{} sent", self.count)
    }
}

/// Pairing stage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Seconds to wait after pairing for the audio source to appear
    pub settle_secs: u64,
    /// Log the connection state reported by `bluetoothctl info` after pairing
    pub verify: bool,
    /// Directory for the transient pairing script
    pub script_dir: PathBuf,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            settle_secs: 3,
            verify: false,
            script_dir: PathBuf::from("."),
        }
    }
}

impl PairingConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

/// Source matching settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Prefix the audio server puts before the address key in Bluetooth source names
    pub prefix: String,
    /// Substring marking a source that is in the headset (HSP/HFP) profile
    pub profile_marker: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            prefix: "bluez_source.".to_string(),
            profile_marker: "headset_head_unit".to_string(),
        }
    }
}

/// Recorder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Directory recordings are written to
    pub output_dir: PathBuf,
    /// File extension; parecord picks the container from it
    pub extension: String,
    /// Milliseconds to wait for the recorder to exit after SIGTERM
    pub stop_timeout_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("recordings"),
            extension: "wav".to_string(),
            stop_timeout_ms: 2000,
        }
    }
}

impl RecorderConfig {
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenbluezConfig {
    pub tools: ToolsConfig,
    pub probe: ProbeConfig,
    pub pairing: PairingConfig,
    pub source: SourceConfig,
    pub recorder: RecorderConfig,
}

impl VenbluezConfig {
    /// Loads configuration from `path`.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed
    pub fn load_from(path: &Path) -> Result<Self, VenbluezError> {
        let content = fs::read_to_string(path).map_err(|e| {
            VenbluezError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::parse(&content)
            .map_err(|e| VenbluezError::Config(format!("{}: {e}", path.display())))?;
        config
            .validate()
            .map_err(|e| VenbluezError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Rejects values that parse but cannot work.
    fn validate(&self) -> Result<(), String> {
        // l2ping treats -c 0 as "ping forever"
        if self.probe.count == 0 {
            return Err("probe.count must be at least 1".to_string());
        }
        Ok(())
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Retrieves the path to the default config file, `~/.config/venbluez/venbluez.toml`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn default_config_path() -> Result<PathBuf, VenbluezError> {
    let home = dirs::home_dir()
        .ok_or_else(|| VenbluezError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".config").join("venbluez").join("venbluez.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_yields_defaults() {
        let config = VenbluezConfig::parse("").unwrap();
        assert_eq!(config, VenbluezConfig::default());
        assert_eq!(config.probe.success_marker(), "1 sent");
        assert_eq!(config.pairing.settle_delay(), Duration::from_secs(3));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = VenbluezConfig::parse(
            r#"
            [tools]
            parecord = "/opt/pulse/bin/parecord"

            [probe]
            count = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.tools.parecord, "/opt/pulse/bin/parecord");
        assert_eq!(config.tools.pactl, "pactl");
        assert!(config.probe.use_sudo);
        assert_eq!(config.probe.success_marker(), "3 sent");
        assert_eq!(config.recorder.output_dir, PathBuf::from("recordings"));
    }

    #[test]
    fn load_from_reports_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("venbluez.toml");
        fs::write(&path, "[probe]\ncount = \"many\"\n").unwrap();

        let err = VenbluezConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, VenbluezError::Config(_)));
        assert!(err.to_string().contains("venbluez.toml"));
    }

    #[test]
    fn load_from_rejects_zero_probe_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("venbluez.toml");
        fs::write(&path, "[probe]\ncount = 0\n").unwrap();

        let err = VenbluezConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, VenbluezError::Config(ref msg) if msg.contains("probe.count")));

        fs::write(&path, "[probe]\ncount = 2\n").unwrap();
        assert_eq!(VenbluezConfig::load_from(&path).unwrap().probe.count, 2);
    }

    #[test]
    fn load_from_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = VenbluezConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, VenbluezError::Config(_)));
    }
}
