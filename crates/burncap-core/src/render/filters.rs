//! Style-to-Filter Compiler
//!
//! Maps a caption style plus the ordered caption segments into an FFmpeg
//! filter expression for the burn-in render. Two strategies are supported
//! behind one interface:
//!
//! - `SubtitleFile`: emit a styled ASS document and reference it from a
//!   single `subtitles=` filter.
//! - `DrawText`: compile one `drawtext=` instruction per segment, each
//!   gated by a `between(t,start,end)` time window.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::captions::{CaptionSegment, CaptionStyle, FontWeight, VerticalPosition};

// =============================================================================
// Escaping
// =============================================================================

/// Escapes a value embedded in an FFmpeg filtergraph.
///
/// Filtergraphs treat `:` and `,` as separators and `\` as an escape
/// character; quotes delimit option values. User-edited caption text and
/// file paths must not be able to break out of the expression.
fn escape_filter_value(raw: &str) -> String {
    raw.replace('\\', r"\\")
        .replace(':', r"\:")
        .replace(',', r"\,")
        .replace('\'', r"\'")
}

/// drawtext expands `%{...}` expressions; treat user-provided text as literal.
fn escape_drawtext_value(raw: &str) -> String {
    escape_filter_value(raw).replace('%', r"\%")
}

// =============================================================================
// Strategy Selection
// =============================================================================

/// Filter compilation strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStrategy {
    /// Styled ASS subtitle file referenced by a single `subtitles=` filter
    #[default]
    SubtitleFile,
    /// One inline `drawtext=` instruction per segment
    DrawText,
}

impl std::str::FromStr for FilterStrategy {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subtitle_file" | "subtitles" | "ass" => Ok(FilterStrategy::SubtitleFile),
            "drawtext" | "inline" => Ok(FilterStrategy::DrawText),
            _ => Err(crate::error::CoreError::ValidationError(format!(
                "Unknown filter strategy: {}",
                s
            ))),
        }
    }
}

/// Output of the style compiler
#[derive(Clone, Debug, PartialEq)]
pub enum CompiledFilter {
    /// ASS document to write to disk; the filter expression is produced by
    /// `subtitle_file_filter` once the path is known
    SubtitleFile { document: String },
    /// Self-contained filter chain, no intermediate file needed
    Inline { filter: String },
}

/// Compiles the style and segments using the requested strategy
pub fn compile_style(
    segments: &[CaptionSegment],
    style: &CaptionStyle,
    strategy: FilterStrategy,
) -> CompiledFilter {
    match strategy {
        FilterStrategy::SubtitleFile => CompiledFilter::SubtitleFile {
            document: build_ass_document(segments, style),
        },
        FilterStrategy::DrawText => CompiledFilter::Inline {
            filter: build_drawtext_chain(segments, style),
        },
    }
}

/// Builds the `subtitles=` filter expression referencing a written ASS file
pub fn subtitle_file_filter(path: &Path) -> String {
    format!("subtitles='{}'", escape_filter_value(&path.to_string_lossy()))
}

// =============================================================================
// ASS Strategy
// =============================================================================

/// Reference render resolution for the ASS style header
const ASS_PLAY_RES_X: u32 = 1920;
const ASS_PLAY_RES_Y: u32 = 1080;

/// ASS numpad alignment code for a vertical position, horizontally centered
fn ass_alignment(position: VerticalPosition) -> u8 {
    match position {
        VerticalPosition::Bottom => 2,
        VerticalPosition::Center => 5,
        VerticalPosition::Top => 8,
    }
}

/// Builds a complete ASS document carrying the style in its V4+ header.
///
/// Colors use the `&HAABBGGRR` channel order with inverted alpha; bold is
/// the format's signed toggle (`-1` on, `0` off). When the style's
/// background is disabled the `BackColour` is fully transparent regardless
/// of the configured background color.
pub fn build_ass_document(segments: &[CaptionSegment], style: &CaptionStyle) -> String {
    let primary = style.color.to_ass_color();
    let outline = style.outline_color.to_ass_color();
    let back = if style.background {
        style.background_color.to_ass_color()
    } else {
        crate::captions::Color::ass_transparent().to_string()
    };
    let bold = match style.font_weight {
        FontWeight::Bold => -1,
        FontWeight::Normal => 0,
    };
    // BorderStyle 3 draws an opaque box behind the text
    let border_style = if style.background { 3 } else { 1 };
    let alignment = ass_alignment(style.position);

    let mut doc = String::new();
    doc.push_str("[Script Info]\n");
    doc.push_str("ScriptType: v4.00+\n");
    doc.push_str(&format!("PlayResX: {}\n", ASS_PLAY_RES_X));
    doc.push_str(&format!("PlayResY: {}\n", ASS_PLAY_RES_Y));
    doc.push_str("WrapStyle: 0\n\n");

    doc.push_str("[V4+ Styles]\n");
    doc.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, OutlineColour, BackColour, \
         Bold, Italic, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, \
         Spacing\n",
    );
    doc.push_str(&format!(
        "Style: Default,{},{},{},{},{},{},0,{},{},0,{},20,20,40,{}\n\n",
        style.font_family,
        style.font_size,
        primary,
        outline,
        back,
        bold,
        border_style,
        style.outline_width,
        alignment,
        style.line_spacing,
    ));

    doc.push_str("[Events]\n");
    doc.push_str("Format: Layer, Start, End, Style, Name, Text\n");

    for seg in segments {
        let text = style.text_case.apply(&seg.text).replace('\n', "\\N");
        doc.push_str(&format!(
            "Dialogue: 0,{},{},Default,,{}\n",
            crate::captions::timecode::format_ass_timestamp(seg.start_sec),
            crate::captions::timecode::format_ass_timestamp(seg.end_sec),
            text,
        ));
    }

    doc
}

// =============================================================================
// DrawText Strategy
// =============================================================================

/// Vertical placement expression for a drawtext instruction
fn drawtext_y_expr(position: VerticalPosition) -> &'static str {
    match position {
        VerticalPosition::Top => "h*0.1",
        VerticalPosition::Center => "(h-text_h)/2",
        VerticalPosition::Bottom => "h-text_h-h*0.1",
    }
}

/// Builds one drawtext instruction per segment, comma-joined into a chain.
///
/// Each instruction carries the escaped literal text, a
/// `between(t,start,end)` visibility window, and explicit screen
/// coordinates. Horizontal placement is always centered.
pub fn build_drawtext_chain(segments: &[CaptionSegment], style: &CaptionStyle) -> String {
    let boxcolor = if style.background {
        format!(
            "{}@{:.2}",
            style.background_color.to_drawtext_color(),
            style.background_color.a as f32 / 255.0
        )
    } else {
        // Fully transparent regardless of the configured background color
        "0x000000@0.0".to_string()
    };

    let y_expr = drawtext_y_expr(style.position);

    segments
        .iter()
        .map(|seg| {
            let text = escape_drawtext_value(&style.text_case.apply(&seg.text));
            let mut parts = vec![
                format!("text='{}'", text),
                format!("enable='between(t,{:.3},{:.3})'", seg.start_sec, seg.end_sec),
                format!("font='{}'", escape_filter_value(&style.font_family)),
                format!("fontsize={}", style.font_size),
                format!("fontcolor={}", style.color.to_drawtext_color()),
                format!(
                    "borderw={}:bordercolor={}",
                    style.outline_width,
                    style.outline_color.to_drawtext_color()
                ),
                format!("box=1:boxcolor={}", boxcolor),
                "x=(w-text_w)/2".to_string(),
                format!("y={}", y_expr),
            ];
            if style.line_spacing != 0.0 {
                parts.push(format!("line_spacing={}", style.line_spacing));
            }
            format!("drawtext={}", parts.join(":"))
        })
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::{Color, TextCase};
    use std::path::PathBuf;

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

    // -------------------------------------------------------------------------
    // Escaping Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("a:b"), r"a\:b");
        assert_eq!(escape_filter_value("a,b"), r"a\,b");
        assert_eq!(escape_filter_value(r"C:\subs"), r"C\:\\subs");
        assert_eq!(escape_filter_value("it's"), r"it\'s");
    }

    #[test]
    fn test_escape_drawtext_value() {
        assert_eq!(escape_drawtext_value("100%"), r"100\%");
    }

    // -------------------------------------------------------------------------
    // ASS Strategy Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_ass_document_structure() {
        let segments = vec![segment(0, 0.0, 1.5, "hello world")];
        let doc = build_ass_document(&segments, &CaptionStyle::default());

        assert!(doc.starts_with("[Script Info]"));
        assert!(doc.contains("[V4+ Styles]"));
        assert!(doc.contains("[Events]"));
        assert!(doc.contains("Dialogue: 0,0:00:00.00,0:00:01.50,Default,,hello world"));
    }

    #[test]
    fn test_ass_colors_and_bold_toggle() {
        let style = CaptionStyle {
            color: Color::rgb(255, 0, 0),
            font_weight: FontWeight::Bold,
            ..Default::default()
        };
        let doc = build_ass_document(&[], &style);

        // &HAABBGGRR with inverted alpha; bold is the signed toggle -1
        assert!(doc.contains("&H000000FF"));
        assert!(doc.contains(",-1,0,"));
    }

    #[test]
    fn test_ass_background_disabled_is_fully_transparent() {
        let style = CaptionStyle {
            color: Color::from_hex("#FF0000").unwrap(),
            background: false,
            background_color: Color::rgb(0, 0, 255),
            ..Default::default()
        };
        let doc = build_ass_document(&[], &style);

        assert!(doc.contains("&HFF000000"));
        // The configured background color must not leak through
        assert!(!doc.contains(Color::rgb(0, 0, 255).to_ass_color().as_str()));
    }

    #[test]
    fn test_ass_background_enabled_uses_box_border_style() {
        let doc = build_ass_document(&[], &CaptionStyle::with_background());
        assert!(doc.contains(",3,")); // BorderStyle 3 = opaque box
    }

    #[test]
    fn test_ass_alignment_codes() {
        assert_eq!(ass_alignment(VerticalPosition::Bottom), 2);
        assert_eq!(ass_alignment(VerticalPosition::Center), 5);
        assert_eq!(ass_alignment(VerticalPosition::Top), 8);
    }

    #[test]
    fn test_ass_applies_case_transform() {
        let style = CaptionStyle {
            text_case: TextCase::Uppercase,
            ..Default::default()
        };
        let doc = build_ass_document(&[segment(0, 0.0, 1.0, "hello")], &style);
        assert!(doc.contains(",HELLO\n"));
    }

    #[test]
    fn test_subtitle_file_filter_escapes_path() {
        let filter = subtitle_file_filter(&PathBuf::from("/tmp/v1.ass"));
        assert_eq!(filter, "subtitles='/tmp/v1.ass'");

        let windows = subtitle_file_filter(&PathBuf::from(r"C:\subs\v1.ass"));
        assert!(windows.contains(r"\:"));
    }

    // -------------------------------------------------------------------------
    // DrawText Strategy Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_drawtext_one_instruction_per_segment() {
        let segments = vec![
            segment(0, 0.0, 1.0, "first"),
            segment(1, 1.0, 2.0, "second"),
        ];
        let chain = build_drawtext_chain(&segments, &CaptionStyle::default());

        assert_eq!(chain.matches("drawtext=").count(), 2);
        assert!(chain.contains("enable='between(t,0.000,1.000)'"));
        assert!(chain.contains("enable='between(t,1.000,2.000)'"));
    }

    #[test]
    fn test_drawtext_escapes_user_text() {
        let segments = vec![segment(0, 0.0, 1.0, "it's 100%: fine, really")];
        let chain = build_drawtext_chain(&segments, &CaptionStyle::default());

        assert!(chain.contains(r"it\'s"));
        assert!(chain.contains(r"100\%"));
        assert!(chain.contains(r"fine\,"));
    }

    #[test]
    fn test_drawtext_vertical_positions() {
        let segments = vec![segment(0, 0.0, 1.0, "hi")];

        for (position, expected) in [
            (VerticalPosition::Top, "y=h*0.1"),
            (VerticalPosition::Center, "y=(h-text_h)/2"),
            (VerticalPosition::Bottom, "y=h-text_h-h*0.1"),
        ] {
            let style = CaptionStyle {
                position,
                ..Default::default()
            };
            let chain = build_drawtext_chain(&segments, &style);
            assert!(chain.contains(expected), "missing {} for {:?}", expected, position);
            assert!(chain.contains("x=(w-text_w)/2"));
        }
    }

    #[test]
    fn test_drawtext_background_disabled_is_fully_transparent() {
        let style = CaptionStyle {
            color: Color::from_hex("#FF0000").unwrap(),
            background: false,
            background_color: Color::rgb(0, 0, 255),
            ..Default::default()
        };
        let chain = build_drawtext_chain(&[segment(0, 0.0, 1.0, "hi")], &style);

        assert!(chain.contains("boxcolor=0x000000@0.0"));
        assert!(!chain.contains("0x0000FF"));
    }

    #[test]
    fn test_drawtext_background_enabled_carries_alpha() {
        let style = CaptionStyle {
            background: true,
            background_color: Color::rgba(0, 0, 0, 255),
            ..Default::default()
        };
        let chain = build_drawtext_chain(&[segment(0, 0.0, 1.0, "hi")], &style);
        assert!(chain.contains("boxcolor=0x000000@1.00"));
    }

    // -------------------------------------------------------------------------
    // Strategy Dispatch Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_compile_style_dispatch() {
        let segments = vec![segment(0, 0.0, 1.0, "hi")];
        let style = CaptionStyle::default();

        match compile_style(&segments, &style, FilterStrategy::SubtitleFile) {
            CompiledFilter::SubtitleFile { document } => {
                assert!(document.contains("[Events]"));
            }
            other => panic!("expected subtitle file, got {:?}", other),
        }

        match compile_style(&segments, &style, FilterStrategy::DrawText) {
            CompiledFilter::Inline { filter } => assert!(filter.starts_with("drawtext=")),
            other => panic!("expected inline filter, got {:?}", other),
        }
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "ass".parse::<FilterStrategy>().unwrap(),
            FilterStrategy::SubtitleFile
        );
        assert_eq!(
            "drawtext".parse::<FilterStrategy>().unwrap(),
            FilterStrategy::DrawText
        );
        assert!("bogus".parse::<FilterStrategy>().is_err());
    }
}
