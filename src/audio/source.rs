//! Audio server source lookup.
//!
//! Once a headset connects in the HSP/HFP profile, PulseAudio exposes its
//! microphone as a source named after the device address, e.g.
//! `bluez_source.aa_bb_cc_dd_ee_ff.headset_head_unit`. The short listing from
//! `pactl list sources short` is one source per line:
//!
//! ```text
//! 0	alsa_input.pci-0000_00_1f.3.analog-stereo	module-alsa-card.c	s16le 2ch 44100Hz	SUSPENDED
//! 3	bluez_source.aa_bb_cc_dd_ee_ff.headset_head_unit	module-bluez5-device.c	s16le 1ch 8000Hz	RUNNING
//! ```

use crate::address::BdAddr;
use crate::config::{SourceConfig, VenbluezConfig};
use crate::error::{Result, VenbluezError};
use crate::ui::report;
use std::process::Stdio;
use tokio::process::Command;

/// One line of the short source listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub index: String,
    pub name: String,
    pub driver: String,
    pub sample_spec: String,
    pub state: String,
}

impl SourceEntry {
    /// Whether the source belongs to a Bluetooth device.
    pub fn is_bluetooth(&self, config: &SourceConfig) -> bool {
        !config.prefix.is_empty() && self.name.starts_with(&config.prefix)
    }

    /// Whether the source is in the headset profile, i.e. usable as a microphone.
    pub fn is_headset(&self, config: &SourceConfig) -> bool {
        self.name.contains(&config.profile_marker)
    }
}

/// Parses the short listing. Columns are tab-separated; lines that only use
/// spaces are split on whitespace with the sample spec taking the middle.
pub fn parse_listing(listing: &str) -> Vec<SourceEntry> {
    listing
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = if line.contains('\t') {
                line.split('\t')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .collect()
            } else {
                line.split_whitespace().collect()
            };
            if fields.len() < 2 {
                return None;
            }

            let state = if fields.len() > 3 {
                fields[fields.len() - 1]
            } else {
                ""
            };
            let spec_end = if fields.len() > 3 { fields.len() - 1 } else { fields.len() };
            let sample_spec = fields.get(3..spec_end).map(|s| s.join(" ")).unwrap_or_default();

            Some(SourceEntry {
                index: fields[0].to_string(),
                name: fields[1].to_string(),
                driver: fields.get(2).copied().unwrap_or_default().to_string(),
                sample_spec,
                state: state.to_string(),
            })
        })
        .collect()
}

/// Finds the first line mentioning both `<prefix><key>` and the profile marker
/// and returns its second whitespace-delimited field.
pub fn find_source(listing: &str, key: &str, config: &SourceConfig) -> Option<String> {
    let needle = format!("{}{}", config.prefix, key);
    listing
        .lines()
        .find(|line| line.contains(&needle) && line.contains(&config.profile_marker))
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
}

/// Recorder invocation the operator can run by hand when auto-matching fails.
pub fn fallback_command(config: &VenbluezConfig, key: &str) -> String {
    format!(
        "{} --device={}{}.{} test.wav",
        config.tools.parecord, config.source.prefix, key, config.source.profile_marker
    )
}

/// Runs `pactl list sources short` and returns its stdout.
///
/// # Errors
/// `SourceQuery` if pactl cannot be started or exits with an error.
pub async fn list_sources(config: &VenbluezConfig) -> Result<String> {
    let output = Command::new(&config.tools.pactl)
        .args(["list", "sources", "short"])
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| VenbluezError::SourceQuery(format!("failed to run {}: {e}", config.tools.pactl)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VenbluezError::SourceQuery(format!(
            "{} exited with {}: {}",
            config.tools.pactl,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Locates the headset microphone source of `addr`.
///
/// # Errors
/// - `SourceQuery` if the audio server cannot be queried
/// - `SourceNotFound` if no source matches the address and profile marker
pub async fn resolve_source(addr: &BdAddr, config: &VenbluezConfig) -> Result<String> {
    report::working("Searching for active Bluetooth mic source (auto-match)...");
    let key = addr.source_key();

    let listing = list_sources(config).await?;
    tracing::debug!("Source listing:\n{}", listing.trim_end());

    match find_source(&listing, &key, &config.source) {
        Some(source) => {
            tracing::info!("Resolved source for {}: {}", addr, source);
            report::success(format!("Found active Bluetooth source: {source}"));
            Ok(source)
        }
        None => {
            tracing::warn!("No '{}' source for key {}", config.source.profile_marker, key);
            Err(VenbluezError::SourceNotFound { key })
        }
    }
}
