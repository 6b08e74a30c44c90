//! Subtitle Timestamp Formatting
//!
//! Fixed-width timestamp formatters for the SRT, WebVTT, and ASS subtitle
//! formats. All formatters truncate (floor) to the field's unit rather than
//! rounding, so a value never carries into the next coarser field.

use crate::types::TimeSec;

/// Formats seconds as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_srt_timestamp(seconds: TimeSec) -> String {
    let (hours, mins, secs, ms) = split_millis(seconds);
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

/// Formats seconds as a WebVTT timestamp (`HH:MM:SS.mmm`)
pub fn format_vtt_timestamp(seconds: TimeSec) -> String {
    let (hours, mins, secs, ms) = split_millis(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
}

/// Formats seconds as an ASS event timestamp (`H:MM:SS.cc`, centiseconds,
/// hour not zero-padded)
pub fn format_ass_timestamp(seconds: TimeSec) -> String {
    let total_cs = (seconds.max(0.0) * 100.0).floor() as u64;
    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, cs)
}

fn split_millis(seconds: TimeSec) -> (u64, u64, u64, u64) {
    let total_ms = (seconds.max(0.0) * 1000.0).floor() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;
    (hours, mins, secs, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_srt_timestamp() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(1.5), "00:00:01,500");
        assert_eq!(format_srt_timestamp(90.0), "00:01:30,000");
        assert_eq!(format_srt_timestamp(3725.125), "01:02:05,125");
    }

    #[test]
    fn test_format_vtt_timestamp() {
        assert_eq!(format_vtt_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_vtt_timestamp(3725.125), "01:02:05.125");
    }

    #[test]
    fn test_format_ass_timestamp() {
        assert_eq!(format_ass_timestamp(0.0), "0:00:00.00");
        assert_eq!(format_ass_timestamp(3725.125), "1:02:05.12");
        assert_eq!(format_ass_timestamp(59.994), "0:00:59.99");
    }

    #[test]
    fn test_truncation_not_rounding() {
        // 0.9996s floors to 999ms; rounding would carry into the seconds field
        assert_eq!(format_srt_timestamp(0.9996), "00:00:00,999");
        assert_eq!(format_ass_timestamp(0.999), "0:00:00.99");
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(format_srt_timestamp(-1.0), "00:00:00,000");
    }
}
