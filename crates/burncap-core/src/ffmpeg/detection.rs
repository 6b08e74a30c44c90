//! FFmpeg Detection Module
//!
//! Finds and validates the FFmpeg/FFprobe binaries on the system PATH.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{FFmpegError, FFmpegResult};
use crate::process::configure_std_command;

/// Information about a detected FFmpeg installation
#[derive(Debug, Clone)]
pub struct FFmpegInfo {
    /// Path to ffmpeg binary
    pub ffmpeg_path: PathBuf,
    /// Path to ffprobe binary
    pub ffprobe_path: PathBuf,
    /// FFmpeg version string
    pub version: String,
}

/// Detects FFmpeg from the system PATH
pub fn detect_system_ffmpeg() -> FFmpegResult<FFmpegInfo> {
    let ffmpeg_path = find_in_path(binary_name("ffmpeg"))?;
    let ffprobe_path = find_in_path(binary_name("ffprobe"))?;
    let version = get_ffmpeg_version(&ffmpeg_path)?;

    Ok(FFmpegInfo {
        ffmpeg_path,
        ffprobe_path,
        version,
    })
}

fn binary_name(base: &str) -> String {
    #[cfg(target_os = "windows")]
    return format!("{}.exe", base);
    #[cfg(not(target_os = "windows"))]
    base.to_string()
}

/// Searches PATH entries for the named binary
fn find_in_path(name: String) -> FFmpegResult<PathBuf> {
    let path_var = std::env::var_os("PATH").ok_or(FFmpegError::NotFound)?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(&name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(FFmpegError::NotFound)
}

/// Runs `ffmpeg -version` and extracts the version line
fn get_ffmpeg_version(ffmpeg_path: &Path) -> FFmpegResult<String> {
    let mut cmd = Command::new(ffmpeg_path);
    cmd.arg("-version");
    configure_std_command(&mut cmd);

    let output = cmd.output().map_err(FFmpegError::ProcessError)?;
    if !output.status.success() {
        return Err(FFmpegError::ExecutionFailed(
            "ffmpeg -version exited with an error".to_string(),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout
        .lines()
        .next()
        .unwrap_or("unknown")
        .trim()
        .to_string();
    Ok(version)
}
