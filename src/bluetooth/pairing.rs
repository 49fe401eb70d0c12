//! Pairing and connection through `bluetoothctl`.
//!
//! bluetoothctl is interactive, so the commands are written to a script file
//! and fed to it on stdin. The attempt is best effort: its output is discarded
//! and whether the device actually connected is not checked here.

use crate::address::BdAddr;
use crate::config::VenbluezConfig;
use crate::ui::report;
use std::io::{self, Write};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tempfile::NamedTempFile;
use tokio::process::Command;

/// The bluetoothctl session: power up, register an agent, pair, trust, connect.
pub fn build_script(addr: &BdAddr) -> String {
    format!(
        "power on\n\
         agent on\n\
         default-agent\n\
         scan on\n\
         pair {addr}\n\
         trust {addr}\n\
         connect {addr}\n\
         exit\n"
    )
}

/// Writes the script into `dir`. The file is removed when the handle drops,
/// which covers errors and an interrupted pipeline alike.
fn write_script(dir: &Path, contents: &str) -> io::Result<NamedTempFile> {
    let mut script = tempfile::Builder::new()
        .prefix("bt_script")
        .suffix(".txt")
        .tempfile_in(dir)?;
    script.write_all(contents.as_bytes())?;
    script.flush()?;
    Ok(script)
}

async fn run_script(addr: &BdAddr, config: &VenbluezConfig) -> io::Result<ExitStatus> {
    let script = write_script(&config.pairing.script_dir, &build_script(addr))?;
    tracing::debug!("Pairing script written to {}", script.path().display());

    let stdin = script.reopen()?;
    Command::new(&config.tools.bluetoothctl)
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
}

/// Runs the pairing script against `addr`. Failures are reported, never raised.
pub async fn pair_and_connect(addr: &BdAddr, config: &VenbluezConfig) {
    report::success(format!(
        "Pairing and connecting to {addr} via {}...",
        config.tools.bluetoothctl
    ));

    match run_script(addr, config).await {
        Ok(status) => {
            tracing::info!("bluetoothctl session for {} exited with {}", addr, status);
            report::success(format!("Pairing & connection attempted for {addr}"));
        }
        Err(e) => {
            tracing::warn!("bluetoothctl session for {} failed: {}", addr, e);
            report::alert(format!("Error during bluetoothctl operation: {e}"));
        }
    }
}

/// Reads `Connected: yes|no` from `bluetoothctl info` output.
pub fn parse_connected(info: &str) -> Option<bool> {
    info.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("Connected:"))
        .map(|value| value.trim() == "yes")
}

/// Asks bluetoothctl whether `addr` is connected and logs the answer.
///
/// Informational only; the pipeline continues either way.
pub async fn verify_connection(addr: &BdAddr, config: &VenbluezConfig) -> Option<bool> {
    let output = Command::new(&config.tools.bluetoothctl)
        .arg("info")
        .arg(addr.to_string())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await;

    let connected = match output {
        Ok(o) => parse_connected(&String::from_utf8_lossy(&o.stdout)),
        Err(e) => {
            tracing::warn!("bluetoothctl info {} failed: {}", addr, e);
            None
        }
    };

    match connected {
        Some(true) => report::success(format!("{addr} reports Connected: yes")),
        Some(false) => report::hint(format!("{addr} reports Connected: no, continuing anyway")),
        None => report::hint(format!("Could not read connection state of {addr}")),
    }
    tracing::info!("Post-pairing connection state of {}: {:?}", addr, connected);
    connected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stub_config, write_stub};
    use std::fs;
    use tempfile::tempdir;

    fn target() -> BdAddr {
        "aa:bb:cc:dd:ee:ff".parse().unwrap()
    }

    fn leftover_scripts(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("bt_script"))
            .collect()
    }

    #[test]
    fn script_targets_normalized_address() {
        let script = build_script(&target());
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines,
            [
                "power on",
                "agent on",
                "default-agent",
                "scan on",
                "pair AA:BB:CC:DD:EE:FF",
                "trust AA:BB:CC:DD:EE:FF",
                "connect AA:BB:CC:DD:EE:FF",
                "exit",
            ]
        );
    }

    #[tokio::test]
    async fn script_is_fed_on_stdin_and_removed() {
        let dir = tempdir().unwrap();
        let received = dir.path().join("received.txt");
        write_stub(
            dir.path(),
            "bluetoothctl",
            &format!("cat > '{}'", received.display()),
        );
        let config = stub_config(dir.path());

        pair_and_connect(&target(), &config).await;

        assert_eq!(fs::read_to_string(&received).unwrap(), build_script(&target()));
        assert!(leftover_scripts(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn failing_agent_still_removes_script() {
        let dir = tempdir().unwrap();
        write_stub(dir.path(), "bluetoothctl", "echo 'No default controller' >&2\nexit 1");
        let config = stub_config(dir.path());

        pair_and_connect(&target(), &config).await;

        assert!(leftover_scripts(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn missing_agent_is_not_fatal() {
        let dir = tempdir().unwrap();
        let config = stub_config(dir.path());

        pair_and_connect(&target(), &config).await;

        assert!(leftover_scripts(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn dropped_session_removes_script() {
        let dir = tempdir().unwrap();
        write_stub(dir.path(), "bluetoothctl", "sleep 30");
        let config = stub_config(dir.path());

        let addr = target();
        let session = pair_and_connect(&addr, &config);
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(300), session)
            .await
            .is_err();

        assert!(timed_out);
        assert!(leftover_scripts(dir.path()).is_empty());
    }

    #[test]
    fn parses_connection_state() {
        let info = "Device AA:BB:CC:DD:EE:FF (public)\n\
                    \tName: Headset\n\
                    \tPaired: yes\n\
                    \tTrusted: yes\n\
                    \tConnected: yes\n";
        assert_eq!(parse_connected(info), Some(true));
        assert_eq!(parse_connected("\tConnected: no\n"), Some(false));
        assert_eq!(parse_connected("Device AA:BB:CC:DD:EE:FF not available\n"), None);
    }

    #[tokio::test]
    async fn verify_reads_info_output() {
        let dir = tempdir().unwrap();
        write_stub(
            dir.path(),
            "bluetoothctl",
            "[ \"$1\" = info ] && printf 'Device %s\\n\\tConnected: yes\\n' \"$2\"",
        );
        let config = stub_config(dir.path());

        assert_eq!(verify_connection(&target(), &config).await, Some(true));
    }
}
