//! Subtitle Serialization
//!
//! Renders stored caption segments as SRT (SubRip) or WebVTT text, with an
//! optional case transform. Serializing an empty segment list is a
//! reportable `NoCaptions` condition, never a silent empty file.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::types::VideoId;

use super::timecode::{format_srt_timestamp, format_vtt_timestamp};
use super::{CaptionSegment, TextCase};

// =============================================================================
// Formats
// =============================================================================

/// Supported subtitle file formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleFormat {
    /// SubRip (`.srt`): numbered cues, comma millisecond separator
    Srt,
    /// WebVTT (`.vtt`): `WEBVTT` header, dot millisecond separator
    Vtt,
}

impl SubtitleFormat {
    /// File extension for this format, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
        }
    }
}

impl std::str::FromStr for SubtitleFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(SubtitleFormat::Srt),
            "vtt" | "webvtt" => Ok(SubtitleFormat::Vtt),
            _ => Err(CoreError::ValidationError(format!(
                "Unsupported subtitle format: {}",
                s
            ))),
        }
    }
}

// =============================================================================
// Serialization
// =============================================================================

/// Serializes ordered caption segments into subtitle text.
///
/// Fails with `NoCaptions` when `segments` is empty.
pub fn serialize_segments(
    video_id: &VideoId,
    segments: &[CaptionSegment],
    format: SubtitleFormat,
    text_case: TextCase,
) -> CoreResult<String> {
    if segments.is_empty() {
        return Err(CoreError::NoCaptions(video_id.clone()));
    }

    Ok(match format {
        SubtitleFormat::Srt => export_srt(segments, text_case),
        SubtitleFormat::Vtt => export_vtt(segments, text_case),
    })
}

/// Exports segments to SRT format: 1-based cue number, timestamps joined by
/// ` --> `, text, blank line between cues.
fn export_srt(segments: &[CaptionSegment], text_case: TextCase) -> String {
    let cues: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(index, seg)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                index + 1,
                format_srt_timestamp(seg.start_sec),
                format_srt_timestamp(seg.end_sec),
                text_case.apply(&seg.text)
            )
        })
        .collect();

    cues.join("\n")
}

/// Exports segments to WebVTT format: `WEBVTT` header, then unnumbered cues.
fn export_vtt(segments: &[CaptionSegment], text_case: TextCase) -> String {
    let cues: Vec<String> = segments
        .iter()
        .map(|seg| {
            format!(
                "{} --> {}\n{}\n",
                format_vtt_timestamp(seg.start_sec),
                format_vtt_timestamp(seg.end_sec),
                text_case.apply(&seg.text)
            )
        })
        .collect();

    format!("WEBVTT\n\n{}", cues.join("\n"))
}

// =============================================================================
// File Output
// =============================================================================

/// Returns the subtitle path for a video: `<dir>/<video_id>.<ext>`
pub fn subtitle_path(dir: &Path, video_id: &VideoId, format: SubtitleFormat) -> PathBuf {
    dir.join(format!("{}.{}", video_id, format.extension()))
}

/// Serializes segments and writes them to `<dir>/<video_id>.<ext>`,
/// returning the written path.
pub fn write_subtitle_file(
    dir: &Path,
    video_id: &VideoId,
    segments: &[CaptionSegment],
    format: SubtitleFormat,
    text_case: TextCase,
) -> CoreResult<PathBuf> {
    let content = serialize_segments(video_id, segments, format, text_case)?;
    let path = subtitle_path(dir, video_id, format);
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, content)?;
    Ok(path)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(index: u32, start: f64, end: f64, text: &str) -> CaptionSegment {
        CaptionSegment {
            id: format!("c{}", index),
            video_id: "v1".to_string(),
            segment_index: index,
            start_sec: start,
            end_sec: end,
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_srt_single_segment_exact_output() {
        let segments = vec![segment(0, 0.0, 1.0, "hello world")];
        let srt = serialize_segments(
            &"v1".to_string(),
            &segments,
            SubtitleFormat::Srt,
            TextCase::Uppercase,
        )
        .unwrap();

        assert_eq!(srt, "1\n00:00:00,000 --> 00:00:01,000\nHELLO WORLD\n");
    }

    #[test]
    fn test_srt_multiple_segments() {
        let segments = vec![
            segment(0, 1.0, 4.0, "first caption"),
            segment(1, 5.5, 8.0, "second caption"),
        ];
        let srt = serialize_segments(
            &"v1".to_string(),
            &segments,
            SubtitleFormat::Srt,
            TextCase::None,
        )
        .unwrap();

        assert_eq!(
            srt,
            "1\n00:00:01,000 --> 00:00:04,000\nfirst caption\n\n\
             2\n00:00:05,500 --> 00:00:08,000\nsecond caption\n"
        );
    }

    #[test]
    fn test_vtt_header_and_unnumbered_cues() {
        let segments = vec![
            segment(0, 1.0, 4.0, "first"),
            segment(1, 5.5, 8.0, "second"),
        ];
        let vtt = serialize_segments(
            &"v1".to_string(),
            &segments,
            SubtitleFormat::Vtt,
            TextCase::None,
        )
        .unwrap();

        assert!(vtt.starts_with("WEBVTT\n\n"));
        assert!(vtt.contains("00:00:01.000 --> 00:00:04.000\nfirst\n"));
        assert!(vtt.contains("00:00:05.500 --> 00:00:08.000\nsecond\n"));
        // No SRT-style cue numbers
        assert!(!vtt.contains("\n1\n"));
    }

    #[test]
    fn test_empty_segments_is_no_captions_error() {
        let result = serialize_segments(
            &"v1".to_string(),
            &[],
            SubtitleFormat::Srt,
            TextCase::None,
        );
        assert!(matches!(result, Err(CoreError::NoCaptions(_))));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("srt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Srt);
        assert_eq!("VTT".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Vtt);
        assert_eq!(
            "webvtt".parse::<SubtitleFormat>().unwrap(),
            SubtitleFormat::Vtt
        );
        assert!("ssa".parse::<SubtitleFormat>().is_err());
    }

    #[test]
    fn test_subtitle_path_derivation() {
        let path = subtitle_path(Path::new("/tmp/subs"), &"vid1".to_string(), SubtitleFormat::Vtt);
        assert_eq!(path, PathBuf::from("/tmp/subs/vid1.vtt"));
    }

    #[test]
    fn test_write_subtitle_file() {
        let dir = tempfile::tempdir().unwrap();
        let segments = vec![segment(0, 0.0, 1.0, "hello")];

        let path = write_subtitle_file(
            dir.path(),
            &"vid1".to_string(),
            &segments,
            SubtitleFormat::Srt,
            TextCase::None,
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello"));
        assert!(path.ends_with("vid1.srt"));
    }
}
