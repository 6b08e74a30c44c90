//! FFmpeg Integration Module
//!
//! Executes the external FFmpeg binary as the render collaborator for
//! burn-in export, and FFprobe for media inspection.

mod detection;
mod runner;

pub use detection::{detect_system_ffmpeg, FFmpegInfo};
pub use runner::{FFmpegRunner, MediaInfo, RenderProgress, SubtitleRenderer, VideoStreamInfo};

/// FFmpeg-related error types
#[derive(Debug, thiserror::Error)]
pub enum FFmpegError {
    #[error("FFmpeg not found. Please install FFmpeg and ensure it is on PATH.")]
    NotFound,

    #[error("FFmpeg execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid input file: {0}")]
    InvalidInput(String),

    #[error("Output path error: {0}")]
    OutputError(String),

    #[error("FFprobe error: {0}")]
    ProbeError(String),

    #[error("Process error: {0}")]
    ProcessError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type FFmpegResult<T> = Result<T, FFmpegError>;

impl From<FFmpegError> for crate::error::CoreError {
    fn from(e: FFmpegError) -> Self {
        crate::error::CoreError::RenderFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffmpeg_error_display() {
        let err = FFmpegError::NotFound;
        assert!(err.to_string().contains("FFmpeg not found"));

        let err = FFmpegError::ExecutionFailed("exit code 1".to_string());
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_ffmpeg_error_converts_to_render_failed() {
        let core: crate::error::CoreError =
            FFmpegError::ExecutionFailed("boom".to_string()).into();
        assert!(matches!(
            core,
            crate::error::CoreError::RenderFailed(_)
        ));
    }
}
