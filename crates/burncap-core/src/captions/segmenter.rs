//! Segment Builder
//!
//! Groups a time-ordered sequence of transcribed words into fixed-size
//! caption segments. Chunk boundaries are purely positional; there is no
//! sentence-boundary awareness.

use crate::error::{CoreError, CoreResult};
use crate::types::VideoId;

use super::{CaptionSegment, Word};

/// Default number of words per caption segment
pub const DEFAULT_WORDS_PER_SEGMENT: usize = 2;

/// Partitions `words` into consecutive chunks of `words_per_segment` and
/// emits one caption segment per chunk. The final chunk may be shorter.
///
/// An empty word sequence yields zero segments, not an error.
/// `words_per_segment` must be at least 1.
pub fn segment_words(
    video_id: &VideoId,
    words: &[Word],
    words_per_segment: usize,
) -> CoreResult<Vec<CaptionSegment>> {
    if words_per_segment == 0 {
        return Err(CoreError::ValidationError(
            "words_per_segment must be at least 1".to_string(),
        ));
    }

    let mut segments = Vec::with_capacity(words.len().div_ceil(words_per_segment));

    for (index, chunk) in words.chunks(words_per_segment).enumerate() {
        let text = chunk
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let confidence =
            chunk.iter().map(|w| w.confidence).sum::<f64>() / chunk.len() as f64;

        segments.push(CaptionSegment {
            id: crate::types::new_id(),
            video_id: video_id.clone(),
            segment_index: index as u32,
            start_sec: chunk[0].start_sec,
            end_sec: chunk[chunk.len() - 1].end_sec,
            text,
            confidence,
        });
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[&str]) -> Vec<Word> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, t)| Word::new(t, i as f64 * 0.5, i as f64 * 0.5 + 0.4, 0.8 + 0.01 * i as f64))
            .collect()
    }

    #[test]
    fn test_segment_count_is_ceil() {
        let vid = "v1".to_string();
        let ws = words(&["a", "b", "c", "d", "e"]);

        assert_eq!(segment_words(&vid, &ws, 2).unwrap().len(), 3);
        assert_eq!(segment_words(&vid, &ws, 1).unwrap().len(), 5);
        assert_eq!(segment_words(&vid, &ws, 5).unwrap().len(), 1);
        assert_eq!(segment_words(&vid, &ws, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_concatenated_text_reproduces_word_sequence() {
        let vid = "v1".to_string();
        let ws = words(&["the", "quick", "brown", "fox", "jumps"]);
        let segments = segment_words(&vid, &ws, 2).unwrap();

        let joined = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(joined, "the quick brown fox jumps");
    }

    #[test]
    fn test_segment_timing_and_confidence() {
        let vid = "v1".to_string();
        let ws = vec![
            Word::new("hello", 0.0, 0.4, 0.8),
            Word::new("world", 0.5, 1.0, 0.9),
            Word::new("again", 1.2, 1.6, 1.0),
        ];
        let segments = segment_words(&vid, &ws, 2).unwrap();

        assert_eq!(segments[0].start_sec, 0.0);
        assert_eq!(segments[0].end_sec, 1.0);
        assert!((segments[0].confidence - 0.85).abs() < 1e-9);

        assert_eq!(segments[1].start_sec, 1.2);
        assert_eq!(segments[1].end_sec, 1.6);
        assert!((segments[1].confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_indexes_are_dense_and_increasing() {
        let vid = "v1".to_string();
        let ws = words(&["a", "b", "c", "d", "e", "f", "g"]);
        let segments = segment_words(&vid, &ws, 3).unwrap();

        for (i, seg) in segments.iter().enumerate() {
            assert_eq!(seg.segment_index, i as u32);
            assert_eq!(seg.video_id, vid);
        }
    }

    #[test]
    fn test_segments_do_not_overlap() {
        let vid = "v1".to_string();
        let ws = words(&["a", "b", "c", "d", "e", "f"]);
        let segments = segment_words(&vid, &ws, 2).unwrap();

        for pair in segments.windows(2) {
            assert!(pair[0].end_sec <= pair[1].start_sec);
        }
    }

    #[test]
    fn test_empty_words_yield_zero_segments() {
        let vid = "v1".to_string();
        let segments = segment_words(&vid, &[], 2).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_zero_words_per_segment_is_validation_error() {
        let vid = "v1".to_string();
        let result = segment_words(&vid, &words(&["a"]), 0);
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }
}
