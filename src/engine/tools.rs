// External tool preflight checks

use anyhow::{Context, Result};
use std::process::Command;

/// Check if ffmpeg is available and return its version
pub fn ffmpeg_version() -> Result<String> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .context("Failed to execute ffmpeg. Is ffmpeg installed and in PATH?")?;

    if !output.status.success() {
        anyhow::bail!("ffmpeg command failed with status: {}", output.status);
    }

    let version_output = String::from_utf8_lossy(&output.stdout);
    let first_line = version_output.lines().next().unwrap_or("Unknown version");

    Ok(first_line.to_string())
}

/// Check if exiftool is available and return its version
pub fn exiftool_version() -> Result<String> {
    let output = Command::new("exiftool")
        .arg("-ver")
        .output()
        .context("Failed to execute exiftool. Is exiftool installed and in PATH?")?;

    if !output.status.success() {
        anyhow::bail!("exiftool command failed with status: {}", output.status);
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(version)
}

/// Check if the makelive injector capability is available.
///
/// makelive only exists where CoreGraphics/AVFoundation do; a failure here
/// means Live Photo conversion is unavailable on this machine.
pub fn makelive_available() -> Result<()> {
    let output = Command::new("makelive")
        .arg("--help")
        .output()
        .context("Failed to execute makelive. Install it with: pip install makelive")?;

    if !output.status.success() {
        anyhow::bail!("makelive command failed with status: {}", output.status);
    }

    Ok(())
}

/// Verify every external capability before any work is scheduled
pub fn check_all() -> Result<()> {
    let mut missing = Vec::new();
    if ffmpeg_version().is_err() {
        missing.push("ffmpeg");
    }
    if exiftool_version().is_err() {
        missing.push("exiftool");
    }
    if !missing.is_empty() {
        anyhow::bail!(
            "missing tools: {} (install with: brew install {})",
            missing.join(", "),
            missing.join(" ")
        );
    }

    makelive_available().context(
        "the makelive identifier injector is unavailable; \
         Live Photo conversion requires macOS with makelive installed",
    )?;

    Ok(())
}
