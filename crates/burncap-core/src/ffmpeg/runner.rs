//! FFmpeg Runner Module
//!
//! Executes FFmpeg commands for the burn-in render step and FFprobe for
//! media inspection. The render call is a long-running blocking subprocess
//! from the caller's point of view; progress lines are forwarded over an
//! optional channel.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{FFmpegError, FFmpegInfo, FFmpegResult};
use crate::process::configure_tokio_command;

// =============================================================================
// Progress
// =============================================================================

/// Progress information for a long-running render
#[derive(Debug, Clone)]
pub struct RenderProgress {
    /// Current frame number
    pub frame: u64,
    /// Progress percentage (0.0 - 100.0), when the input duration is known
    pub percent: f32,
    /// Current processing speed (fps)
    pub fps: f32,
    /// Current time position in the output
    pub time_sec: f64,
}

// =============================================================================
// Media Info
// =============================================================================

/// Media information extracted by FFprobe
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MediaInfo {
    /// Duration in seconds
    pub duration_sec: f64,
    /// Video stream info (if present)
    pub video: Option<VideoStreamInfo>,
    /// Container format
    pub format: String,
    /// File size in bytes
    pub size_bytes: u64,
}

/// Video stream information
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VideoStreamInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Codec name (e.g., "h264", "vp9")
    pub codec: String,
}

// =============================================================================
// Renderer Seam
// =============================================================================

/// Render collaborator consumed by the export orchestrator.
///
/// Takes an input video path and a compiled filter expression, produces the
/// output video. Implemented by `FFmpegRunner`; tests substitute a mock.
#[async_trait]
pub trait SubtitleRenderer: Send + Sync {
    /// Renders `input` with the given `-vf` filter expression into `output`
    async fn burn_in(
        &self,
        input: &Path,
        filter: &str,
        output: &Path,
        progress_tx: Option<mpsc::Sender<RenderProgress>>,
    ) -> FFmpegResult<()>;
}

// =============================================================================
// FFmpeg Runner
// =============================================================================

/// FFmpeg Runner for executing video processing commands
#[derive(Clone)]
pub struct FFmpegRunner {
    info: Arc<FFmpegInfo>,
}

impl FFmpegRunner {
    /// Create a new FFmpegRunner from a detected FFmpeg installation
    pub fn new(info: FFmpegInfo) -> Self {
        Self {
            info: Arc::new(info),
        }
    }

    /// Get the FFmpeg info
    pub fn info(&self) -> &FFmpegInfo {
        &self.info
    }

    /// Probe media file to get information
    pub async fn probe(&self, input: &Path) -> FFmpegResult<MediaInfo> {
        if !input.exists() {
            return Err(FFmpegError::InvalidInput(format!(
                "Input file does not exist: {}",
                input.display()
            )));
        }

        let mut cmd = tokio::process::Command::new(&self.info.ffprobe_path);
        cmd.args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            &input.to_string_lossy(),
        ]);
        configure_tokio_command(&mut cmd);

        let output = cmd.output().await.map_err(FFmpegError::ProcessError)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FFmpegError::ProbeError(format!("FFprobe failed: {}", stderr)));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(&json_str)
    }
}

#[async_trait]
impl SubtitleRenderer for FFmpegRunner {
    async fn burn_in(
        &self,
        input: &Path,
        filter: &str,
        output: &Path,
        progress_tx: Option<mpsc::Sender<RenderProgress>>,
    ) -> FFmpegResult<()> {
        if !input.exists() {
            return Err(FFmpegError::InvalidInput(format!(
                "Input file does not exist: {}",
                input.display()
            )));
        }

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FFmpegError::OutputError(format!("Failed to create output directory: {}", e))
            })?;
        }

        // Probe for duration so progress can be reported as a percentage
        let duration_sec = self.probe(input).await.map(|m| m.duration_sec).unwrap_or(0.0);

        let mut cmd = tokio::process::Command::new(&self.info.ffmpeg_path);
        cmd.args([
            "-i",
            &input.to_string_lossy(),
            "-vf",
            filter,
            "-c:a",
            "copy",
            "-progress",
            "pipe:1", // Output progress to stdout
            "-y",
            &output.to_string_lossy(),
        ]);
        configure_tokio_command(&mut cmd);

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(FFmpegError::ProcessError)?;

        let stderr_handle = child.stderr.take();

        if let Some(tx) = progress_tx {
            if let Some(stdout) = child.stdout.take() {
                tokio::spawn(async move {
                    use tokio::io::{AsyncBufReadExt, BufReader};
                    let reader = BufReader::new(stdout);
                    let mut lines = reader.lines();

                    let mut current_frame = 0u64;
                    let mut current_time = 0.0f64;
                    let mut current_fps = 0.0f32;

                    while let Ok(Some(line)) = lines.next_line().await {
                        if let Some(value) = line.strip_prefix("frame=") {
                            current_frame = value.trim().parse().unwrap_or(0);
                        } else if let Some(value) = line.strip_prefix("fps=") {
                            current_fps = value.trim().parse().unwrap_or(0.0);
                        } else if let Some(value) = line.strip_prefix("out_time_ms=") {
                            let us: u64 = value.trim().parse().unwrap_or(0);
                            current_time = us as f64 / 1_000_000.0;
                        } else if line.starts_with("progress=") {
                            let percent = if duration_sec > 0.0 {
                                ((current_time / duration_sec) * 100.0).min(100.0) as f32
                            } else {
                                0.0
                            };

                            let progress = RenderProgress {
                                frame: current_frame,
                                percent,
                                fps: current_fps,
                                time_sec: current_time,
                            };

                            if tx.send(progress).await.is_err() {
                                break;
                            }
                        }
                    }
                });
            }
        }

        // Capture stderr so a failure carries the renderer's diagnostics
        let stderr_task = tokio::spawn(async move {
            use tokio::io::AsyncReadExt;
            let mut buf = String::new();
            if let Some(mut stderr) = stderr_handle {
                let _ = stderr.read_to_string(&mut buf).await;
            }
            buf
        });

        let status = child.wait().await.map_err(FFmpegError::ProcessError)?;

        if !status.success() {
            let stderr = stderr_task.await.unwrap_or_default();
            return Err(FFmpegError::ExecutionFailed(format!(
                "Burn-in render failed: {}",
                stderr.lines().last().unwrap_or("unknown error")
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Probe Parsing
// =============================================================================

/// Parse FFprobe JSON output
fn parse_probe_output(json_str: &str) -> FFmpegResult<MediaInfo> {
    let json: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FFmpegError::ParseError(format!("Failed to parse FFprobe output: {}", e)))?;

    let format = json
        .get("format")
        .ok_or_else(|| FFmpegError::ParseError("Missing format info".to_string()))?;

    let duration_sec = format
        .get("duration")
        .and_then(|d| d.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let format_name = format
        .get("format_name")
        .and_then(|f| f.as_str())
        .unwrap_or("unknown")
        .to_string();

    let size_bytes = format
        .get("size")
        .and_then(|s| s.as_str())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let video = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| {
            streams.iter().find(|s| {
                s.get("codec_type").and_then(|t| t.as_str()) == Some("video")
            })
        })
        .map(|stream| VideoStreamInfo {
            width: stream.get("width").and_then(|w| w.as_u64()).unwrap_or(0) as u32,
            height: stream.get("height").and_then(|h| h.as_u64()).unwrap_or(0) as u32,
            codec: stream
                .get("codec_name")
                .and_then(|c| c.as_str())
                .unwrap_or("unknown")
                .to_string(),
        });

    Ok(MediaInfo {
        duration_sec,
        video,
        format: format_name,
        size_bytes,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{
            "format": {
                "duration": "12.5",
                "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                "size": "1048576"
            },
            "streams": [
                {"codec_type": "audio", "codec_name": "aac"},
                {"codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080}
            ]
        }"#;

        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.duration_sec, 12.5);
        assert_eq!(info.size_bytes, 1048576);

        let video = info.video.unwrap();
        assert_eq!(video.width, 1920);
        assert_eq!(video.height, 1080);
        assert_eq!(video.codec, "h264");
    }

    #[test]
    fn test_parse_probe_output_missing_format() {
        let result = parse_probe_output("{}");
        assert!(matches!(result, Err(FFmpegError::ParseError(_))));
    }

    #[test]
    fn test_parse_probe_output_invalid_json() {
        let result = parse_probe_output("not json");
        assert!(matches!(result, Err(FFmpegError::ParseError(_))));
    }
}
