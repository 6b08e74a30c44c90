//! Burncap Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

use crate::types::{CaptionId, VideoId};

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Input Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Not-Found Errors
    // =========================================================================
    #[error("Video not found: {0}")]
    VideoNotFound(VideoId),

    #[error("Caption not found: {0}")]
    CaptionNotFound(CaptionId),

    // =========================================================================
    // Empty-Result Conditions
    // =========================================================================
    #[error("Video has no captions: {0}")]
    NoCaptions(VideoId),

    // =========================================================================
    // Upstream Service Errors
    // =========================================================================
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Transcription already in flight for video: {0}")]
    TranscriptionInFlight(VideoId),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    // =========================================================================
    // Infrastructure Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<rusqlite::Error> for CoreError {
    fn from(e: rusqlite::Error) -> Self {
        CoreError::StorageError(e.to_string())
    }
}
