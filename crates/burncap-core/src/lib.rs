//! Burncap Core Library
//!
//! Caption pipeline for short videos: cloud transcription with word-level
//! timestamps, filler-word removal, fixed-size segmentation, a SQLite-backed
//! caption store, SRT/VTT serialization, and styled burn-in export through
//! FFmpeg (libass subtitle files or drawtext filter chains).

pub mod captions;
pub mod error;
pub mod ffmpeg;
pub mod process;
pub mod render;
pub mod store;
pub mod transcribe;
pub mod types;

pub use captions::{
    is_filler_word, segment_words, serialize_segments, strip_filler_words, subtitle_path,
    write_subtitle_file, CaptionSegment, CaptionStyle, Color, FontWeight, SubtitleFormat,
    TextCase, VerticalPosition, Video, VideoStatus, Word, DEFAULT_WORDS_PER_SEGMENT,
};
pub use error::{CoreError, CoreResult};
pub use ffmpeg::{
    detect_system_ffmpeg, FFmpegError, FFmpegInfo, FFmpegResult, FFmpegRunner, RenderProgress,
    SubtitleRenderer,
};
pub use render::{compile_style, CompiledFilter, ExportStage, Exporter, FilterStrategy};
pub use store::CaptionStore;
pub use transcribe::{
    CloudTranscriber, PollOutcome, TranscribeError, Transcriber, TranscriptionConfig,
    TranscriptionService,
};
pub use types::{new_id, CaptionId, TimeSec, VideoId};
