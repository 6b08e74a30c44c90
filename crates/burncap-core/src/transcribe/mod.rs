//! Transcription Module
//!
//! The cloud speech-to-text collaborator is consumed as an opaque producer
//! of (word, start, end, confidence) tuples behind the `Transcriber` trait.
//! `TranscriptionService` drives the pipeline: transcribe, strip fillers,
//! segment, persist, update status.

mod cloud;
mod service;

pub use cloud::CloudTranscriber;
pub use service::{PollOutcome, TranscriptionService};

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::captions::Word;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during transcription
#[derive(Error, Debug)]
pub enum TranscribeError {
    /// Video file not found or unreadable
    #[error("Video file not readable: {0}")]
    FileError(String),

    /// HTTP transport or service error
    #[error("Transcription request failed: {0}")]
    RequestFailed(String),

    /// Response could not be interpreted
    #[error("Invalid transcription response: {0}")]
    InvalidResponse(String),
}

/// Result type for transcription operations
pub type TranscribeResult<T> = Result<T, TranscribeError>;

impl From<TranscribeError> for crate::error::CoreError {
    fn from(e: TranscribeError) -> Self {
        crate::error::CoreError::TranscriptionFailed(e.to_string())
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Options for a transcription request
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// Language code (e.g., "en-US")
    pub language: String,
    /// Whether the service should emit word-level timestamps
    pub word_time_offsets: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            word_time_offsets: true,
        }
    }
}

// =============================================================================
// Collaborator Seam
// =============================================================================

/// Speech-to-text collaborator.
///
/// Implementations return a flat chronological word list. When the service
/// offers multiple transcription alternatives, only the first alternative of
/// each result is used.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes the video at `path` into word-level tuples
    async fn transcribe(
        &self,
        path: &Path,
        config: &TranscriptionConfig,
    ) -> TranscribeResult<Vec<Word>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranscriptionConfig::default();
        assert_eq!(config.language, "en-US");
        assert!(config.word_time_offsets);
    }

    #[test]
    fn test_error_converts_to_core_error() {
        let core: crate::error::CoreError =
            TranscribeError::RequestFailed("boom".to_string()).into();
        assert!(matches!(
            core,
            crate::error::CoreError::TranscriptionFailed(_)
        ));
    }
}
