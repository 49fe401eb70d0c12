//! List the audio server's input sources.

use crate::config;
use crate::audio::source::{list_sources, parse_listing};
use console::style;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Prints every input source, flagging Bluetooth ones and headset-profile ones.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If the audio server cannot be queried
pub async fn handle_sources(
    config_path: Option<&Path>,
    token: &CancellationToken,
) -> anyhow::Result<()> {
    let config = config::load(config_path)?;
    let Some(listing) = token.run_until_cancelled(list_sources(&config)).await else {
        return Ok(());
    };
    let listing = listing?;
    let entries = parse_listing(&listing);

    if entries.is_empty() {
        println!("No audio input sources reported by {}.", config.tools.pactl);
        return Ok(());
    }

    println!();
    println!("Available audio input sources:");
    println!();

    for entry in &entries {
        let mut tags = String::new();
        if entry.is_bluetooth(&config.source) {
            tags.push_str(&format!(" {}", style("[BLUETOOTH]").blue()));
        }
        if entry.is_headset(&config.source) {
            tags.push_str(&format!(" {}", style("[HEADSET]").green()));
        }

        println!("  ID: {}", entry.index);
        println!("    Name: {}{}", entry.name, tags);
        if !entry.driver.is_empty() {
            println!("    Driver: {}", entry.driver);
        }
        if !entry.sample_spec.is_empty() {
            println!("    Format: {}", entry.sample_spec);
        }
        if !entry.state.is_empty() {
            println!("    State: {}", entry.state);
        }
        println!();
    }

    let headsets = entries
        .iter()
        .filter(|e| e.is_bluetooth(&config.source) && e.is_headset(&config.source))
        .count();
    tracing::info!("Listed {} sources, {} Bluetooth headset", entries.len(), headsets);

    Ok(())
}
