//! Microphone capture with `parecord`.
//!
//! The recorder runs until it exits by itself or the run's cancellation token
//! fires. On cancellation it gets SIGTERM so parecord can finalize the file
//! header; it is never killed outright.

use crate::address::BdAddr;
use crate::config::{RecorderConfig, VenbluezConfig};
use crate::error::{Result, VenbluezError};
use crate::ui::report;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// How a recording session ended.
#[derive(Debug)]
pub enum RecordingOutcome {
    /// The recorder exited on its own.
    Finished { path: PathBuf, status: ExitStatus },
    /// The run was interrupted and the recorder asked to stop.
    Interrupted { path: PathBuf },
}

impl RecordingOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Finished { path, .. } | Self::Interrupted { path } => path,
        }
    }
}

/// `<output_dir>/<AA_BB_CC_DD_EE_FF>.<extension>`
pub fn output_path(config: &RecorderConfig, addr: &BdAddr) -> PathBuf {
    config
        .output_dir
        .join(format!("{}.{}", addr.file_stem(), config.extension))
}

/// Records `source` into the file for `addr` until the recorder exits or
/// `cancel` fires.
///
/// # Errors
/// - `Io` if the output directory cannot be created
/// - `RecorderSpawn` if parecord cannot be started
pub async fn record(
    addr: &BdAddr,
    source: &str,
    config: &VenbluezConfig,
    cancel: &CancellationToken,
) -> Result<RecordingOutcome> {
    report::success("Starting audio recording... Press Ctrl+C to stop.");

    tokio::fs::create_dir_all(&config.recorder.output_dir).await?;
    let path = output_path(&config.recorder, addr);

    let mut child = Command::new(&config.tools.parecord)
        .arg("--device")
        .arg(source)
        .arg(&path)
        .stdin(Stdio::null())
        .spawn()
        .map_err(|e| {
            tracing::error!("Failed to spawn {}: {}", config.tools.parecord, e);
            VenbluezError::RecorderSpawn(e)
        })?;

    tracing::info!(
        "Recorder started (pid {:?}): {} -> {}",
        child.id(),
        source,
        path.display()
    );
    report::detail(format!("Writing to {}", path.display()));

    let exited = tokio::select! {
        status = child.wait() => Some(status),
        _ = cancel.cancelled() => None,
    };

    match exited {
        Some(status) => {
            let status = status?;
            if status.success() {
                tracing::info!("Recorder exited: {}", status);
            } else {
                tracing::warn!("Recorder exited with {}", status);
                report::alert(format!("Recorder exited with {status}"));
            }
            report_saved(&path);
            Ok(RecordingOutcome::Finished { path, status })
        }
        None => {
            terminate(&mut child, config.recorder.stop_timeout()).await;
            report_saved(&path);
            Ok(RecordingOutcome::Interrupted { path })
        }
    }
}

/// Tells the operator where the recording is, if the recorder wrote one.
fn report_saved(path: &Path) -> bool {
    if path.exists() {
        report::success(format!("Recording saved to {}", path.display()));
        true
    } else {
        tracing::warn!("Recorder left no file at {}", path.display());
        report::alert(format!("No recording was written to {}", path.display()));
        false
    }
}

/// Sends SIGTERM and waits up to `timeout` for the recorder to go away.
async fn terminate(child: &mut Child, timeout: Duration) {
    request_stop(child);

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => tracing::info!("Recorder stopped: {}", status),
        Ok(Err(e)) => tracing::warn!("Failed to wait for recorder: {}", e),
        Err(_) => tracing::warn!(
            "Recorder still running {}ms after SIGTERM, leaving it",
            timeout.as_millis()
        ),
    }
}

#[cfg(unix)]
fn request_stop(child: &Child) {
    let Some(pid) = child.id() else {
        tracing::debug!("Recorder already reaped, nothing to terminate");
        return;
    };
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        tracing::warn!("Recorder pid {} out of range", pid);
        return;
    };

    // SAFETY: kill(2) has no memory-safety preconditions; the pid belongs to
    // a child we have not reaped yet.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        tracing::info!("Sent SIGTERM to recorder (pid {})", pid);
    } else {
        tracing::warn!(
            "Failed to signal recorder (pid {}): {}",
            pid,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn request_stop(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::warn!("Failed to stop recorder: {}", e);
    }
}
