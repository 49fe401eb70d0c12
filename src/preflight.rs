//! Required tool discovery.
//!
//! Every stage of the pipeline shells out to an external program. They are all
//! looked up before anything runs so a missing package is reported up front
//! instead of halfway through a pairing attempt.

use crate::config::VenbluezConfig;
use crate::error::{Result, VenbluezError};
use std::path::{Path, PathBuf};

/// Lists the programs this configuration needs, in the order they are checked.
pub fn required_tools(config: &VenbluezConfig) -> Vec<&str> {
    let tools = &config.tools;
    let mut required = vec![
        tools.l2ping.as_str(),
        tools.parecord.as_str(),
        tools.bluetoothctl.as_str(),
        tools.pactl.as_str(),
    ];
    if config.probe.use_sudo {
        required.push(tools.sudo.as_str());
    }
    required
}

/// Checks that each tool is available, stopping at the first missing one.
///
/// # Errors
/// `MissingTool` naming the first tool that could not be found.
pub fn check_requirements(tools: &[&str]) -> Result<()> {
    for tool in tools {
        match find_in_path(tool) {
            Some(path) => tracing::debug!("Found {} at: {}", tool, path.display()),
            None => {
                tracing::error!("Required tool '{}' not found", tool);
                return Err(VenbluezError::MissingTool((*tool).to_string()));
            }
        }
    }
    Ok(())
}

/// Resolves a program the way the shell would.
///
/// Names containing a path separator are checked directly; bare names are
/// searched for in each `PATH` entry.
pub fn find_in_path(binary_name: &str) -> Option<PathBuf> {
    let candidate = Path::new(binary_name);
    if binary_name.is_empty() {
        return None;
    }
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary_name))
        .find(|path| is_executable(path))
}

/// Distribution package that usually ships `tool`.
pub fn install_hint(tool: &str) -> Option<&'static str> {
    let name = Path::new(tool).file_name()?.to_str()?;
    match name {
        "l2ping" | "bluetoothctl" => Some("bluez (e.g. apt install bluez)"),
        "pactl" | "parecord" => Some("pulseaudio-utils (e.g. apt install pulseaudio-utils)"),
        "sudo" => Some("sudo, or set probe.use_sudo = false and grant l2ping CAP_NET_RAW"),
        _ => None,
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stub_config, write_stub};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn all_present_passes() {
        let dir = tempdir().unwrap();
        for name in ["l2ping", "parecord", "bluetoothctl", "pactl"] {
            write_stub(dir.path(), name, "exit 0");
        }
        let config = stub_config(dir.path());

        check_requirements(&required_tools(&config)).unwrap();
    }

    #[test]
    fn reports_first_missing_tool_in_order() {
        let dir = tempdir().unwrap();
        let config = stub_config(dir.path());

        // Nothing present: l2ping is checked first.
        let err = check_requirements(&required_tools(&config)).unwrap_err();
        assert!(matches!(&err, VenbluezError::MissingTool(t) if t == &config.tools.l2ping));

        // bluetoothctl and pactl missing: bluetoothctl is reported, not pactl.
        write_stub(dir.path(), "l2ping", "exit 0");
        write_stub(dir.path(), "parecord", "exit 0");
        let err = check_requirements(&required_tools(&config)).unwrap_err();
        assert!(matches!(&err, VenbluezError::MissingTool(t) if t == &config.tools.bluetoothctl));

        write_stub(dir.path(), "bluetoothctl", "exit 0");
        let err = check_requirements(&required_tools(&config)).unwrap_err();
        assert!(matches!(&err, VenbluezError::MissingTool(t) if t == &config.tools.pactl));
    }

    #[test]
    fn sudo_is_required_only_when_probe_elevates() {
        let dir = tempdir().unwrap();
        let mut config = stub_config(dir.path());
        assert_eq!(required_tools(&config).len(), 4);

        config.probe.use_sudo = true;
        let tools = required_tools(&config);
        assert_eq!(tools.len(), 5);
        assert_eq!(tools[4], config.tools.sudo);
    }

    #[test]
    fn non_executable_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pactl");
        fs::write(&path, "#!/bin/sh\n").unwrap();

        assert!(find_in_path(path.to_str().unwrap()).is_none());
        assert!(find_in_path("").is_none());
    }

    #[test]
    fn bare_names_are_searched_on_path() {
        assert!(find_in_path("sh").is_some());
        assert!(find_in_path("venbluez-definitely-not-installed").is_none());
    }

    #[test]
    fn install_hints_name_packages() {
        assert!(install_hint("l2ping").unwrap().contains("bluez"));
        assert!(install_hint("/usr/bin/parecord").unwrap().contains("pulseaudio-utils"));
        assert!(install_hint("custom-recorder").is_none());
    }
}
