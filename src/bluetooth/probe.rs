//! Link-layer reachability probe.
//!
//! Sends a single L2CAP echo request with `l2ping`. A device that answers is
//! in range and has its radio on, which is all the pairing stage needs.

use crate::address::BdAddr;
use crate::config::VenbluezConfig;
use crate::ui::report;
use std::process::{Output, Stdio};
use tokio::process::Command;

/// Builds `[sudo] l2ping -c <count> <addr>`.
fn probe_command(addr: &BdAddr, config: &VenbluezConfig) -> Command {
    let mut command = if config.probe.use_sudo {
        let mut sudo = Command::new(&config.tools.sudo);
        sudo.arg(&config.tools.l2ping);
        sudo
    } else {
        Command::new(&config.tools.l2ping)
    };
    command
        .arg("-c")
        .arg(config.probe.count.to_string())
        .arg(addr.to_string())
        .stdin(Stdio::null())
        .kill_on_drop(true);
    command
}

/// stdout followed by stderr, lossily decoded.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Probes `addr` once and reports whether it answered.
///
/// Never fails: a non-zero exit or a probe that cannot be started is logged and
/// treated as "not reachable".
pub async fn check_reachability(addr: &BdAddr, config: &VenbluezConfig) -> bool {
    report::success(format!(
        "Checking if {addr} is reachable (via {})...",
        config.tools.l2ping
    ));
    let marker = config.probe.success_marker();

    let output = match probe_command(addr, config).output().await {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("Failed to run {}: {}", config.tools.l2ping, e);
            report::alert(format!("Unexpected error in l2ping: {e}"));
            return false;
        }
    };

    let text = combined_output(&output);
    tracing::debug!("l2ping exited with {}: {}", output.status, text.trim());

    if !output.status.success() {
        tracing::info!("{} did not respond to l2ping ({})", addr, output.status);
        report::negative("Device not responding to l2ping.");
        report::detail(format!("Error: {}", text.trim()));
        return false;
    }

    if text.contains(&marker) {
        tracing::info!("{} answered l2ping", addr);
        report::success(format!("Device {addr} is responding. Likely reachable."));
        true
    } else {
        tracing::info!("l2ping output for {} lacks '{}'", addr, marker);
        report::negative(format!("l2ping finished without reporting '{marker}'."));
        false
    }
}
