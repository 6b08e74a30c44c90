//! Caption Store
//!
//! Persistence layer for videos and caption segments. The store supports
//! whole-row video insert, status update, transactional bulk replacement of
//! a video's segment set, an ordered single-video read, and a text-only
//! segment update.

mod db;

pub use db::CaptionDb;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::params;

use crate::captions::{CaptionSegment, Video, VideoStatus};
use crate::error::{CoreError, CoreResult};
use crate::types::{CaptionId, VideoId};

// =============================================================================
// Caption Store
// =============================================================================

/// Thread-safe store for videos and caption segments.
///
/// Constructed explicitly and passed into components at construction time;
/// the connection lives for the process lifetime.
pub struct CaptionStore {
    db: Mutex<CaptionDb>,
}

impl CaptionStore {
    /// Opens (or creates) the store at the given path
    pub fn create<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        Ok(Self {
            db: Mutex::new(CaptionDb::create(path)?),
        })
    }

    /// Creates an in-memory store (for testing)
    pub fn in_memory() -> CoreResult<Self> {
        Ok(Self {
            db: Mutex::new(CaptionDb::in_memory()?),
        })
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, CaptionDb>> {
        self.db
            .lock()
            .map_err(|_| CoreError::Internal("Caption store lock poisoned".to_string()))
    }

    // -------------------------------------------------------------------------
    // Video Operations
    // -------------------------------------------------------------------------

    /// Inserts a new video record
    pub fn insert_video(&self, video: &Video) -> CoreResult<()> {
        let db = self.lock()?;
        db.connection().execute(
            r#"
            INSERT INTO videos (id, filename, path, size_bytes, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                video.id,
                video.filename,
                video.path,
                video.size_bytes as i64,
                video.status.as_str(),
                video.created_at,
            ],
        )?;
        Ok(())
    }

    /// Loads a video by id, failing with `VideoNotFound` for unknown ids
    pub fn get_video(&self, video_id: &VideoId) -> CoreResult<Video> {
        let db = self.lock()?;
        let mut stmt = db.connection().prepare(
            r#"
            SELECT id, filename, path, size_bytes, status, created_at
            FROM videos WHERE id = ?1
            "#,
        )?;

        let mut rows = stmt.query_map(params![video_id], |row| {
            let status_str: String = row.get(4)?;
            Ok(Video {
                id: row.get(0)?,
                filename: row.get(1)?,
                path: row.get(2)?,
                size_bytes: row.get::<_, i64>(3)? as u64,
                status: VideoStatus::parse(&status_str).unwrap_or(VideoStatus::Error),
                created_at: row.get(5)?,
            })
        })?;

        match rows.next() {
            Some(video) => Ok(video?),
            None => Err(CoreError::VideoNotFound(video_id.clone())),
        }
    }

    /// Updates a video's lifecycle status
    pub fn update_video_status(&self, video_id: &VideoId, status: VideoStatus) -> CoreResult<()> {
        let db = self.lock()?;
        let updated = db.connection().execute(
            "UPDATE videos SET status = ?1 WHERE id = ?2",
            params![status.as_str(), video_id],
        )?;

        if updated == 0 {
            return Err(CoreError::VideoNotFound(video_id.clone()));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Caption Operations
    // -------------------------------------------------------------------------

    /// Replaces a video's entire segment set in one transaction.
    ///
    /// This is the only write path for segment sets: segments are bulk-created
    /// once per completed transcription run and never partially deleted.
    pub fn replace_captions(
        &self,
        video_id: &VideoId,
        segments: &[CaptionSegment],
    ) -> CoreResult<()> {
        let mut db = self.lock()?;
        let tx = db.connection_mut().transaction()?;

        tx.execute("DELETE FROM captions WHERE video_id = ?1", params![video_id])?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO captions (id, video_id, segment_index, start_sec, end_sec, text, confidence)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;

            for seg in segments {
                stmt.execute(params![
                    seg.id,
                    seg.video_id,
                    seg.segment_index,
                    seg.start_sec,
                    seg.end_sec,
                    seg.text,
                    seg.confidence,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Loads all segments for a video, ordered by segment index
    pub fn captions_for_video(&self, video_id: &VideoId) -> CoreResult<Vec<CaptionSegment>> {
        let db = self.lock()?;
        let mut stmt = db.connection().prepare(
            r#"
            SELECT id, video_id, segment_index, start_sec, end_sec, text, confidence
            FROM captions WHERE video_id = ?1
            ORDER BY segment_index ASC
            "#,
        )?;

        let rows = stmt.query_map(params![video_id], |row| {
            Ok(CaptionSegment {
                id: row.get(0)?,
                video_id: row.get(1)?,
                segment_index: row.get(2)?,
                start_sec: row.get(3)?,
                end_sec: row.get(4)?,
                text: row.get(5)?,
                confidence: row.get(6)?,
            })
        })?;

        let mut segments = Vec::new();
        for row in rows {
            segments.push(row?);
        }
        Ok(segments)
    }

    /// Updates only the text of a single segment.
    ///
    /// Timing, index, and confidence are left untouched.
    pub fn update_caption_text(&self, caption_id: &CaptionId, text: &str) -> CoreResult<()> {
        let db = self.lock()?;
        let updated = db.connection().execute(
            "UPDATE captions SET text = ?1 WHERE id = ?2",
            params![text, caption_id],
        )?;

        if updated == 0 {
            return Err(CoreError::CaptionNotFound(caption_id.clone()));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
