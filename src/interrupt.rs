//! Interrupt handling.
//!
//! Ctrl+C (and SIGTERM on Unix) cancels the run's token instead of killing the
//! process, so the stage that is running gets to clean up: the recorder is
//! asked to stop and the pairing script is removed. A second signal exits
//! immediately.

use crate::ui::report;
use tokio_util::sync::CancellationToken;

/// Registers the signal listeners and spawns the task that cancels `token`.
///
/// Must be called from within the Tokio runtime.
///
/// # Errors
/// If the signal handlers cannot be registered.
#[cfg(unix)]
pub fn install(token: CancellationToken) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    // Registered before returning so that a signal arriving right after
    // startup is already routed to the token.
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        };
        on_signal(name, &token);

        tokio::select! {
            _ = interrupt.recv() => {},
            _ = terminate.recv() => {},
        }
        tracing::warn!("Second signal received, exiting without cleanup");
        std::process::exit(0);
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn install(token: CancellationToken) -> std::io::Result<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal("Ctrl+C", &token);
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(0);
        }
    });
    Ok(())
}

fn on_signal(name: &str, token: &CancellationToken) {
    tracing::info!("Received {}, stopping", name);
    eprintln!();
    report::alert("Stopping recording...");
    token.cancel();
}
