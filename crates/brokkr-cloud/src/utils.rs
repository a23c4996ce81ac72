//! Shared helpers for CLI-backed providers

use which::which;

/// Check whether an executable is on PATH
pub fn command_exists(name: &str) -> bool {
    which(name).is_ok()
}

/// Probe a CLI for its version string (first output line)
pub fn command_version(name: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(name).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    text.lines().next().map(|line| line.trim().to_string())
}
