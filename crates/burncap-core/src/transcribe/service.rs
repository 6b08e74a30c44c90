//! Transcription Service
//!
//! Fire-and-forget pipeline driver: the caller gets an immediate
//! acknowledgment and polls the video status to learn completion. At most
//! one transcription per video id is in flight at any time.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{error, info};

use crate::captions::{segment_words, strip_filler_words, VideoStatus};
use crate::error::{CoreError, CoreResult};
use crate::store::CaptionStore;
use crate::types::VideoId;

use super::{Transcriber, TranscriptionConfig};

// =============================================================================
// Poll Outcome
// =============================================================================

/// Terminal outcome of a bounded status poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// Transcription finished and captions are stored
    Completed,
    /// Transcription failed; the video status is `Error`
    Failed,
    /// The deadline elapsed while the video was still non-terminal.
    /// Distinct from `Failed`: the pipeline may still be running.
    TimedOut,
}

// =============================================================================
// Transcription Service
// =============================================================================

/// Drives the transcription pipeline against the caption store.
pub struct TranscriptionService {
    store: Arc<CaptionStore>,
    transcriber: Arc<dyn Transcriber>,
    /// Video ids with a transcription currently in flight
    in_flight: Arc<Mutex<HashSet<VideoId>>>,
}

impl TranscriptionService {
    /// Creates a new service
    pub fn new(store: Arc<CaptionStore>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            store,
            transcriber,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Starts a transcription run for the video and returns immediately.
    ///
    /// The video is marked `Processing` and the pipeline runs on a spawned
    /// task: transcribe, strip fillers, segment, bulk-replace captions, then
    /// mark `Completed` (or `Error` on any failure). A second request for a
    /// video already in flight fails with `TranscriptionInFlight` and
    /// touches neither status nor captions.
    pub fn start_transcription(
        &self,
        video_id: &VideoId,
        config: TranscriptionConfig,
        words_per_segment: usize,
    ) -> CoreResult<tokio::task::JoinHandle<()>> {
        if words_per_segment == 0 {
            return Err(CoreError::ValidationError(
                "words_per_segment must be at least 1".to_string(),
            ));
        }

        let video = self.store.get_video(video_id)?;

        {
            let mut guard = self
                .in_flight
                .lock()
                .map_err(|_| CoreError::Internal("in-flight set lock poisoned".to_string()))?;
            if !guard.insert(video_id.clone()) {
                return Err(CoreError::TranscriptionInFlight(video_id.clone()));
            }
        }

        // Release the in-flight slot if the status write fails; the spawned
        // task (the normal removal site) never runs on this path.
        if let Err(e) = self
            .store
            .update_video_status(video_id, VideoStatus::Processing)
        {
            if let Ok(mut guard) = self.in_flight.lock() {
                guard.remove(video_id);
            }
            return Err(e);
        }
        info!(video_id = %video_id, "transcription started");

        let store = Arc::clone(&self.store);
        let transcriber = Arc::clone(&self.transcriber);
        let in_flight = Arc::clone(&self.in_flight);
        let id = video_id.clone();
        let path = PathBuf::from(video.path);

        let handle = tokio::spawn(async move {
            let result =
                run_pipeline(&store, transcriber.as_ref(), &id, &path, &config, words_per_segment)
                    .await;

            if let Err(e) = &result {
                error!(video_id = %id, error = %e, "transcription pipeline failed");
                if let Err(status_err) = store.update_video_status(&id, VideoStatus::Error) {
                    error!(video_id = %id, error = %status_err, "failed to record error status");
                }
            }

            if let Ok(mut guard) = in_flight.lock() {
                guard.remove(&id);
            }
        });

        Ok(handle)
    }

    /// Polls the video status until it reaches a terminal state or the
    /// deadline elapses.
    pub async fn wait_for_status(
        &self,
        video_id: &VideoId,
        timeout: Duration,
        poll_interval: Duration,
    ) -> CoreResult<PollOutcome> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let video = self.store.get_video(video_id)?;
            match video.status {
                VideoStatus::Completed => return Ok(PollOutcome::Completed),
                VideoStatus::Error => return Ok(PollOutcome::Failed),
                _ => {}
            }

            if tokio::time::Instant::now() >= deadline {
                return Ok(PollOutcome::TimedOut);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Returns true if a transcription is currently in flight for the video
    pub fn is_in_flight(&self, video_id: &VideoId) -> bool {
        self.in_flight
            .lock()
            .map(|guard| guard.contains(video_id))
            .unwrap_or(false)
    }
}

/// One pipeline run: transcribe, filter, segment, persist, complete.
async fn run_pipeline(
    store: &CaptionStore,
    transcriber: &dyn Transcriber,
    video_id: &VideoId,
    path: &std::path::Path,
    config: &TranscriptionConfig,
    words_per_segment: usize,
) -> CoreResult<()> {
    let words = transcriber.transcribe(path, config).await?;
    let surviving = strip_filler_words(words);
    let segments = segment_words(video_id, &surviving, words_per_segment)?;

    // Zero surviving words still completes the video, with zero segments
    store.replace_captions(video_id, &segments)?;
    store.update_video_status(video_id, VideoStatus::Completed)?;

    info!(
        video_id = %video_id,
        segments = segments.len(),
        "transcription completed"
    );
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
