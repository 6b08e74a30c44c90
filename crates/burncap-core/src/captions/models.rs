//! Caption Data Models
//!
//! Defines data structures for videos, transcribed words, caption segments,
//! and caption styling.

use serde::{Deserialize, Serialize};

use crate::types::{CaptionId, TimeSec, VideoId};

// =============================================================================
// Video Lifecycle
// =============================================================================

/// Processing status of an uploaded video
///
/// Tracks the lifecycle from upload through transcription. Callers poll this
/// field to learn when a fire-and-forget transcription run has finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoStatus {
    /// Upload in progress or just completed
    #[default]
    Uploading,
    /// Transcription is running
    Processing,
    /// Transcription finished and captions are stored
    Completed,
    /// Transcription or a downstream step failed
    Error,
}

impl VideoStatus {
    /// Returns the string form stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Uploading => "uploading",
            VideoStatus::Processing => "processing",
            VideoStatus::Completed => "completed",
            VideoStatus::Error => "error",
        }
    }

    /// Parses the database string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uploading" => Some(VideoStatus::Uploading),
            "processing" => Some(VideoStatus::Processing),
            "completed" => Some(VideoStatus::Completed),
            "error" => Some(VideoStatus::Error),
            _ => None,
        }
    }

    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Error)
    }
}

/// An uploaded source video
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Unique identifier
    pub id: VideoId,
    /// Original filename as uploaded
    pub filename: String,
    /// Storage path on disk
    pub path: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Lifecycle status
    pub status: VideoStatus,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Video {
    /// Creates a new video record with auto-generated ID
    pub fn new(filename: &str, path: &str, size_bytes: u64) -> Self {
        Self {
            id: crate::types::new_id(),
            filename: filename.to_string(),
            path: path.to_string(),
            size_bytes,
            status: VideoStatus::Uploading,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// =============================================================================
// Transcribed Words
// =============================================================================

/// A single transcribed word with timing and confidence
///
/// Transient: produced by the transcription collaborator, consumed once by
/// the segment builder, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    /// Lower-cased token
    pub text: String,
    /// Start time in seconds
    pub start_sec: TimeSec,
    /// End time in seconds
    pub end_sec: TimeSec,
    /// Recognition confidence (0.0 - 1.0)
    pub confidence: f64,
}

impl Word {
    /// Creates a new word, lower-casing the token
    pub fn new(text: &str, start_sec: f64, end_sec: f64, confidence: f64) -> Self {
        Self {
            text: text.to_lowercase(),
            start_sec,
            end_sec,
            confidence,
        }
    }
}

// =============================================================================
// Caption Segments
// =============================================================================

/// A fixed-size group of consecutive words rendered as one caption unit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionSegment {
    /// Unique identifier
    pub id: CaptionId,
    /// Owning video
    pub video_id: VideoId,
    /// Zero-based position within the video (dense, no gaps)
    pub segment_index: u32,
    /// Start time of the first constituent word
    pub start_sec: TimeSec,
    /// End time of the last constituent word
    pub end_sec: TimeSec,
    /// Space-joined constituent words
    pub text: String,
    /// Arithmetic mean of constituent word confidences
    pub confidence: f64,
}

impl CaptionSegment {
    /// Returns the duration of this segment in seconds
    pub fn duration(&self) -> f64 {
        self.end_sec - self.start_sec
    }

    /// Returns true if the segment is visible at the given playback time
    pub fn is_visible_at(&self, time_sec: f64) -> bool {
        time_sec >= self.start_sec && time_sec < self.end_sec
    }
}

// =============================================================================
// Caption Styling
// =============================================================================

/// RGBA color value (0-255 for each component)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Creates a new color from RGBA components
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from RGB components
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Parses a 6-hex-digit RGB string, with or without a leading `#`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// Converts to ASS/SSA color format (&HAABBGGRR, alpha inverted)
    pub fn to_ass_color(&self) -> String {
        format!(
            "&H{:02X}{:02X}{:02X}{:02X}",
            255 - self.a,
            self.b,
            self.g,
            self.r
        )
    }

    /// Fully transparent in ASS format, independent of the RGB channels
    pub fn ass_transparent() -> &'static str {
        "&HFF000000"
    }

    /// Converts to the `0xRRGGBB` form accepted by drawtext color options
    pub fn to_drawtext_color(&self) -> String {
        format!("0x{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}

/// Vertical position of caption text on screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPosition {
    /// Bottom of screen (default for subtitles)
    #[default]
    Bottom,
    /// Top of screen
    Top,
    /// Center of screen
    Center,
}

/// Text case transform applied at serialization/render time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextCase {
    /// Leave text as stored
    #[default]
    None,
    /// Upper-case all caption text
    Uppercase,
    /// Lower-case all caption text
    Lowercase,
}

impl TextCase {
    /// Applies this transform to the given text
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextCase::None => text.to_string(),
            TextCase::Uppercase => text.to_uppercase(),
            TextCase::Lowercase => text.to_lowercase(),
        }
    }
}

/// Font weight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Caption visual style, supplied per export request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionStyle {
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub font_size: u32,
    /// Font weight
    pub font_weight: FontWeight,
    /// Text fill color
    pub color: Color,
    /// Outline/stroke color
    pub outline_color: Color,
    /// Outline width in pixels
    pub outline_width: f32,
    /// Whether to draw a background box behind the text
    pub background: bool,
    /// Background box color (ignored when `background` is false)
    pub background_color: Color,
    /// Line spacing in pixels
    pub line_spacing: f32,
    /// Vertical position on screen
    pub position: VerticalPosition,
    /// Case transform applied to caption text
    pub text_case: TextCase,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 48,
            font_weight: FontWeight::Normal,
            color: Color::white(),
            outline_color: Color::black(),
            outline_width: 2.0,
            background: false,
            background_color: Color::rgba(0, 0, 0, 180),
            line_spacing: 0.0,
            position: VerticalPosition::Bottom,
            text_case: TextCase::None,
        }
    }
}

impl CaptionStyle {
    /// Style with an opaque background box
    pub fn with_background() -> Self {
        Self {
            background: true,
            outline_width: 0.0,
            ..Default::default()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
