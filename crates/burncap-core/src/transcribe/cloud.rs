//! Cloud Transcriber
//!
//! Implements the `Transcriber` trait against an HTTP speech-to-text
//! service that accepts raw media bytes and returns word-level timestamps.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::captions::Word;

use super::{TranscribeError, TranscribeResult, Transcriber, TranscriptionConfig};

// =============================================================================
// Cloud Transcriber
// =============================================================================

/// HTTP speech-to-text client
pub struct CloudTranscriber {
    /// Recognition endpoint URL
    endpoint: String,
    /// Bearer token for the service
    api_key: String,
    /// HTTP client
    client: reqwest::Client,
}

impl CloudTranscriber {
    /// Request timeout; transcription of short videos is expected to finish
    /// well within this window.
    const TIMEOUT_SECS: u64 = 300;

    /// Creates a new cloud transcriber
    pub fn new(endpoint: &str, api_key: &str) -> TranscribeResult<Self> {
        if endpoint.is_empty() {
            return Err(TranscribeError::RequestFailed(
                "Transcription endpoint is required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[async_trait]
impl Transcriber for CloudTranscriber {
    async fn transcribe(
        &self,
        path: &Path,
        config: &TranscriptionConfig,
    ) -> TranscribeResult<Vec<Word>> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| TranscribeError::FileError(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), size = bytes.len(), "uploading media for transcription");

        let media_part = reqwest::multipart::Part::bytes(bytes)
            .file_name(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "upload".to_string()),
            )
            .mime_str("application/octet-stream")
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("media", media_part)
            .text("language", config.language.clone())
            .text(
                "word_time_offsets",
                if config.word_time_offsets { "true" } else { "false" },
            );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranscribeError::RequestFailed(format!(
                "Service returned status {}",
                response.status()
            )));
        }

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::InvalidResponse(e.to_string()))?;

        Ok(flatten_words(body))
    }
}

// =============================================================================
// Response Parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    words: Vec<WordInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordInfo {
    word: String,
    start_time: f64,
    end_time: f64,
    #[serde(default)]
    confidence: f64,
}

/// Flattens a recognition response into chronological words, taking only
/// the first alternative of each result.
fn flatten_words(response: RecognizeResponse) -> Vec<Word> {
    response
        .results
        .into_iter()
        .filter_map(|result| result.alternatives.into_iter().next())
        .flat_map(|alt| alt.words)
        .map(|w| Word::new(&w.word, w.start_time, w.end_time, w.confidence))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_endpoint() {
        assert!(CloudTranscriber::new("", "key").is_err());
        assert!(CloudTranscriber::new("https://speech.example/v1:recognize", "key").is_ok());
    }

    #[test]
    fn test_flatten_takes_first_alternative_only() {
        let response: RecognizeResponse = serde_json::from_str(
            r#"{
                "results": [
                    {
                        "alternatives": [
                            {"words": [
                                {"word": "Hello", "startTime": 0.0, "endTime": 0.4, "confidence": 0.92},
                                {"word": "world", "startTime": 0.5, "endTime": 0.9, "confidence": 0.88}
                            ]},
                            {"words": [
                                {"word": "yellow", "startTime": 0.0, "endTime": 0.4, "confidence": 0.3}
                            ]}
                        ]
                    },
                    {
                        "alternatives": [
                            {"words": [
                                {"word": "again", "startTime": 1.0, "endTime": 1.4, "confidence": 0.95}
                            ]}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let words = flatten_words(response);
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "hello"); // lower-cased
        assert_eq!(words[1].text, "world");
        assert_eq!(words[2].text, "again");
        assert_eq!(words[2].start_sec, 1.0);
    }

    #[test]
    fn test_flatten_empty_response() {
        let response: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert!(flatten_words(response).is_empty());
    }
}
