//! Reachability check without pairing or recording.

use crate::address::BdAddr;
use crate::bluetooth;
use crate::commands::capture::preflight_or_explain;
use crate::config;
use crate::error::VenbluezError;
use crate::ui::report;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Runs the preflight check and a single reachability probe against `address`.
/// An interrupt during the probe ends the check successfully.
///
/// # Errors
/// - If the address is malformed or the configuration cannot be loaded
/// - If a required tool is missing
/// - If the target does not answer
pub async fn handle_check(
    address: &str,
    config_path: Option<&Path>,
    token: &CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("=== venbluez check started ===");

    let addr: BdAddr = address.parse()?;
    let config = config::load(config_path)?;
    preflight_or_explain(&config)?;

    let Some(reachable) = token
        .run_until_cancelled(bluetooth::check_reachability(&addr, &config))
        .await
    else {
        tracing::info!("Check interrupted");
        return Ok(());
    };

    if !reachable {
        report::negative("Target device is not reachable.");
        return Err(VenbluezError::Unreachable(addr.to_string()).into());
    }

    tracing::info!("{} is reachable", addr);
    Ok(())
}
