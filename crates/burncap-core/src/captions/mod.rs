//! Caption Module
//!
//! Transcript-to-caption pipeline: filler-word removal, fixed-size word
//! segmentation, and subtitle serialization.

mod filler;
pub mod formats;
mod models;
mod segmenter;
pub mod timecode;

pub use filler::{is_filler_word, strip_filler_words};
pub use formats::{serialize_segments, subtitle_path, write_subtitle_file, SubtitleFormat};
pub use models::{
    CaptionSegment, CaptionStyle, Color, FontWeight, TextCase, VerticalPosition, Video,
    VideoStatus, Word,
};
pub use segmenter::{segment_words, DEFAULT_WORDS_PER_SEGMENT};
