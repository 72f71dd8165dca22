use anyhow::{Context, Result, bail};
use log::debug;
use std::process::Command;

/// Run a shell command and return its trimmed stdout.
///
/// Anything written to stderr is treated as a failure.
pub fn run_sys(command: &str) -> Result<String> {
    debug!("Running system command: {}", command);

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .with_context(|| format!("Failed to spawn system command: \"{}\"", command))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        bail!(
            "An error occurred when running system command: \"{}\"\n{}",
            command,
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
