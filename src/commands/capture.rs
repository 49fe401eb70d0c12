//! Probe, pair, locate the headset microphone and record it.
//!
//! Stages run strictly in order and each one gates the next. Every stage before
//! the recorder is raced against the cancellation token, so an interrupt at any
//! point ends the run cleanly with status 0.

use crate::address::BdAddr;
use crate::audio::{self, source, RecordingOutcome};
use crate::bluetooth;
use crate::config::{self, VenbluezConfig};
use crate::error::VenbluezError;
use crate::preflight;
use crate::ui::report;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// How a capture run ended, when it did not fail.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The recorder ran and exited or was stopped.
    Recorded(RecordingOutcome),
    /// Interrupted before recording started.
    Interrupted,
}

/// Handles the default command. `token` is cancelled by the interrupt handler.
///
/// # Errors
/// - If the address is malformed
/// - If the configuration cannot be loaded
/// - If any fatal stage fails (see [`run_pipeline`])
pub async fn handle_capture(
    address: &str,
    config_path: Option<&Path>,
    token: &CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("=== venbluez capture started ===");
    report::banner();

    let addr: BdAddr = address.parse()?;
    let config = config::load(config_path)?;

    preflight_or_explain(&config)?;

    match run_pipeline(&addr, &config, token).await {
        Ok(CaptureOutcome::Recorded(RecordingOutcome::Finished { path, status })) => {
            tracing::info!("Capture finished ({}): {}", status, path.display());
        }
        Ok(CaptureOutcome::Recorded(outcome)) => {
            tracing::info!("Capture stopped by interrupt: {}", outcome.path().display());
        }
        Ok(CaptureOutcome::Interrupted) => {
            tracing::info!("Capture interrupted before recording started");
        }
        Err(e) => {
            explain_failure(&e, &addr, &config);
            return Err(e.into());
        }
    }

    tracing::info!("=== venbluez capture exited ===");
    Ok(())
}

/// Runs the preflight check and prints an install hint when it fails.
pub(crate) fn preflight_or_explain(config: &VenbluezConfig) -> Result<(), VenbluezError> {
    preflight::check_requirements(&preflight::required_tools(config)).inspect_err(|e| {
        if let VenbluezError::MissingTool(tool) = e {
            if let Some(hint) = preflight::install_hint(tool) {
                report::hint(format!("'{tool}' is provided by {hint}"));
            }
        }
    })
}

/// Runs every stage after preflight.
///
/// # Errors
/// - `Unreachable` if the target does not answer the probe
/// - `SourceQuery` / `SourceNotFound` if no microphone source can be found
/// - `RecorderSpawn` if the recorder cannot be started
pub async fn run_pipeline(
    addr: &BdAddr,
    config: &VenbluezConfig,
    token: &CancellationToken,
) -> Result<CaptureOutcome, VenbluezError> {
    let Some(reachable) = token
        .run_until_cancelled(bluetooth::check_reachability(addr, config))
        .await
    else {
        return Ok(CaptureOutcome::Interrupted);
    };
    if !reachable {
        return Err(VenbluezError::Unreachable(addr.to_string()));
    }

    if token
        .run_until_cancelled(bluetooth::pair_and_connect(addr, config))
        .await
        .is_none()
    {
        return Ok(CaptureOutcome::Interrupted);
    }

    // Give the audio server time to register the new source.
    let settle = config.pairing.settle_delay();
    tracing::debug!("Waiting {:?} for the audio source to appear", settle);
    if token
        .run_until_cancelled(tokio::time::sleep(settle))
        .await
        .is_none()
    {
        return Ok(CaptureOutcome::Interrupted);
    }

    if config.pairing.verify
        && token
            .run_until_cancelled(bluetooth::verify_connection(addr, config))
            .await
            .is_none()
    {
        return Ok(CaptureOutcome::Interrupted);
    }

    let Some(source) = token
        .run_until_cancelled(audio::resolve_source(addr, config))
        .await
    else {
        return Ok(CaptureOutcome::Interrupted);
    };
    let source = source?;

    let outcome = audio::record(addr, &source, config, token).await?;
    Ok(CaptureOutcome::Recorded(outcome))
}

/// Prints the operator-facing explanation for a fatal pipeline error.
fn explain_failure(err: &VenbluezError, addr: &BdAddr, config: &VenbluezConfig) {
    match err {
        VenbluezError::Unreachable(_) => {
            report::negative("Target device is not reachable.");
        }
        VenbluezError::SourceNotFound { .. } | VenbluezError::SourceQuery(_) => {
            if matches!(err, VenbluezError::SourceNotFound { .. }) {
                report::negative("Bluetooth mic source not found in PulseAudio source list.");
            }
            report::hint("Make sure the device is connected and in HSP/HFP profile.");
            report::hint("You can manually test using:");
            report::detail(source::fallback_command(config, &addr.source_key()));
        }
        _ => {}
    }
}
