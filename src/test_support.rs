//! Shell-script stand-ins for the external tools, used by unit tests.

use crate::config::{ToolsConfig, VenbluezConfig};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script named `name` into `dir`.
pub fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Config whose tools all live in `dir`, with no sudo and no settle delay.
pub fn stub_config(dir: &Path) -> VenbluezConfig {
    let tool = |name: &str| dir.join(name).to_string_lossy().into_owned();
    let mut config = VenbluezConfig {
        tools: ToolsConfig {
            l2ping: tool("l2ping"),
            bluetoothctl: tool("bluetoothctl"),
            pactl: tool("pactl"),
            parecord: tool("parecord"),
            sudo: tool("sudo"),
        },
        ..VenbluezConfig::default()
    };
    config.probe.use_sudo = false;
    config.pairing.settle_secs = 0;
    config.pairing.script_dir = dir.to_path_buf();
    config.recorder.output_dir = dir.join("recordings");
    config.recorder.stop_timeout_ms = 5000;
    config
}
