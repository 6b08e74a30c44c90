//! Filler-Word Filter
//!
//! Removes conversational disfluencies from a transcribed word stream before
//! segmentation, so fillers never occupy a segment slot or shift the timing
//! of surviving words.

use super::Word;

/// Disfluency tokens excluded from captions. Matched against lower-cased
/// tokens exactly; the filter is positional, not linguistic.
const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "hmm",
    "ah",
    "like",
    "you know",
    "so",
    "basically",
    "actually",
];

/// Returns true if the given lower-cased word is a filler
pub fn is_filler_word(word: &str) -> bool {
    FILLER_WORDS.contains(&word)
}

/// Removes filler words, preserving the relative order and timestamps of
/// the surviving words. Idempotent.
pub fn strip_filler_words(words: Vec<Word>) -> Vec<Word> {
    words
        .into_iter()
        .filter(|w| !is_filler_word(&w.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64) -> Word {
        Word::new(text, start, start + 0.4, 0.9)
    }

    #[test]
    fn test_is_filler_word() {
        assert!(is_filler_word("um"));
        assert!(is_filler_word("basically"));
        assert!(!is_filler_word("hello"));
        // Matching is exact on the lower-cased token
        assert!(!is_filler_word("Um"));
    }

    #[test]
    fn test_strip_preserves_order_and_timing() {
        let words = vec![word("um", 0.0), word("hello", 0.5), word("uh", 1.0), word("world", 1.5)];
        let surviving = strip_filler_words(words);

        assert_eq!(surviving.len(), 2);
        assert_eq!(surviving[0].text, "hello");
        assert_eq!(surviving[0].start_sec, 0.5);
        assert_eq!(surviving[1].text, "world");
        assert_eq!(surviving[1].start_sec, 1.5);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let words = vec![word("so", 0.0), word("hello", 0.5), word("actually", 1.0)];
        let once = strip_filler_words(words);
        let twice = strip_filler_words(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_all_fillers_yields_empty() {
        let words = vec![word("um", 0.0), word("uh", 0.5)];
        assert!(strip_filler_words(words).is_empty());
    }
}
