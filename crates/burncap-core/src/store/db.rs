//! Caption Database Module
//!
//! SQLite database holding uploaded videos and their caption segments.

use rusqlite::Connection;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Caption Database
// =============================================================================

/// SQLite connection wrapper for the caption store
pub struct CaptionDb {
    conn: Connection,
}

impl CaptionDb {
    /// Creates a new database at the specified path, initializing the schema
    pub fn create<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::StorageError(format!("Failed to create database: {}", e)))?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Opens an existing database
    pub fn open<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::StorageError(format!("Failed to open database: {}", e)))?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn in_memory() -> CoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            CoreError::StorageError(format!("Failed to create in-memory database: {}", e))
        })?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initializes the database schema
    fn init_schema(&self) -> CoreResult<()> {
        self.conn
            .execute_batch(
                r#"
                -- Videos table: uploaded source videos and their lifecycle status
                CREATE TABLE IF NOT EXISTS videos (
                    id TEXT PRIMARY KEY,
                    filename TEXT NOT NULL,
                    path TEXT NOT NULL,
                    size_bytes INTEGER NOT NULL,
                    status TEXT NOT NULL,
                    created_at TEXT NOT NULL DEFAULT (datetime('now'))
                );

                -- Captions table: segmented transcript, bulk-replaced per run
                CREATE TABLE IF NOT EXISTS captions (
                    id TEXT PRIMARY KEY,
                    video_id TEXT NOT NULL,
                    segment_index INTEGER NOT NULL,
                    start_sec REAL NOT NULL,
                    end_sec REAL NOT NULL,
                    text TEXT NOT NULL,
                    confidence REAL NOT NULL,
                    created_at TEXT NOT NULL DEFAULT (datetime('now'))
                );

                -- Indexes for efficient queries
                CREATE INDEX IF NOT EXISTS idx_captions_video ON captions(video_id);
                CREATE INDEX IF NOT EXISTS idx_captions_order ON captions(video_id, segment_index);
                "#,
            )
            .map_err(|e| CoreError::StorageError(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    /// Gets the underlying connection (for module-level access)
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Gets the underlying connection mutably (for transactions)
    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
