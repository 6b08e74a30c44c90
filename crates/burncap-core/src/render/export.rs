//! Burn-In Export Orchestrator
//!
//! Sequences a burn-in export request: style compile, intermediate subtitle
//! file write, external render invocation, cleanup, result path. A request
//! moves through `Start → StyleCompiled → AuxFileWritten → Rendering → Done`
//! or ends in `Failed`; there is no retry, the caller decides whether to
//! re-request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::captions::CaptionStyle;
use crate::error::{CoreError, CoreResult};
use crate::ffmpeg::{RenderProgress, SubtitleRenderer};
use crate::store::CaptionStore;
use crate::types::VideoId;

use super::filters::{compile_style, subtitle_file_filter, CompiledFilter, FilterStrategy};

// =============================================================================
// Export Stages
// =============================================================================

/// Stage of an export request's state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportStage {
    Start,
    StyleCompiled,
    AuxFileWritten,
    Rendering,
    Done,
    Failed,
}

// =============================================================================
// Export Orchestrator
// =============================================================================

/// Orchestrates burn-in exports against the caption store and the render
/// collaborator. Dependencies are passed in at construction time.
pub struct Exporter {
    store: Arc<CaptionStore>,
    renderer: Arc<dyn SubtitleRenderer>,
    /// Directory for intermediate subtitle files
    work_dir: PathBuf,
}

impl Exporter {
    /// Creates a new exporter
    pub fn new(
        store: Arc<CaptionStore>,
        renderer: Arc<dyn SubtitleRenderer>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            renderer,
            work_dir,
        }
    }

    /// Runs one export request and returns the output video path.
    ///
    /// Fails with `NoCaptions` before any render invocation when the video
    /// has no stored segments. The intermediate subtitle file (when the
    /// strategy requires one) is removed best-effort on both the success
    /// and failure paths; a cleanup failure is logged, never propagated.
    pub async fn export(
        &self,
        video_id: &VideoId,
        style: &CaptionStyle,
        strategy: FilterStrategy,
        output_path: &Path,
        progress_tx: Option<mpsc::Sender<RenderProgress>>,
    ) -> CoreResult<PathBuf> {
        debug!(video_id = %video_id, stage = ?ExportStage::Start, "export requested");

        let video = self.store.get_video(video_id)?;
        let segments = self.store.captions_for_video(video_id)?;
        if segments.is_empty() {
            warn!(video_id = %video_id, "export rejected: no captions");
            return Err(CoreError::NoCaptions(video_id.clone()));
        }

        let compiled = compile_style(&segments, style, strategy);
        debug!(video_id = %video_id, stage = ?ExportStage::StyleCompiled, ?strategy, "style compiled");

        let (filter, aux_file) = match compiled {
            CompiledFilter::SubtitleFile { document } => {
                let path = self.work_dir.join(format!("{}.ass", video_id));
                std::fs::create_dir_all(&self.work_dir)?;
                if let Err(e) = std::fs::write(&path, document) {
                    // A partial file may exist after a failed write
                    let _ = std::fs::remove_file(&path);
                    error!(video_id = %video_id, stage = ?ExportStage::Failed, error = %e, "failed to write subtitle file");
                    return Err(e.into());
                }
                debug!(video_id = %video_id, stage = ?ExportStage::AuxFileWritten, path = %path.display(), "subtitle file written");
                (subtitle_file_filter(&path), Some(path))
            }
            CompiledFilter::Inline { filter } => (filter, None),
        };

        debug!(video_id = %video_id, stage = ?ExportStage::Rendering, "invoking render");
        let result = self
            .renderer
            .burn_in(Path::new(&video.path), &filter, output_path, progress_tx)
            .await;

        // Cleanup runs on both paths; the rendered video is the deliverable,
        // a leftover subtitle file is only worth a warning.
        if let Some(path) = aux_file {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(video_id = %video_id, path = %path.display(), error = %e, "failed to remove intermediate subtitle file");
            }
        }

        match result {
            Ok(()) => {
                info!(video_id = %video_id, stage = ?ExportStage::Done, output = %output_path.display(), "export finished");
                Ok(output_path.to_path_buf())
            }
            Err(e) => {
                error!(video_id = %video_id, stage = ?ExportStage::Failed, error = %e, "export failed");
                Err(e.into())
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
