use crate::transcript::TranscriptSegment;

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`)
///
/// Milliseconds are truncated, not rounded. Hours are not wrapped, so values
/// past 99 hours simply widen the field.
pub fn format_timestamp(seconds: f64) -> String {
    let whole = seconds as u64;
    let hrs = whole / 3600;
    let mins = (whole % 3600) / 60;
    let secs = whole % 60;
    let millis = ((seconds - whole as f64) * 1000.0) as u64;

    format!("{:02}:{:02}:{:02},{:03}", hrs, mins, secs, millis)
}

/// Generate SRT content from caption entries, re-timed to a clip's start
///
/// Entry timestamps are absolute; each is shifted by `clip_start_time` so the
/// output is relative to the clip itself. Entries that end before the clip
/// begins are dropped; entries that start before the clip but extend into it
/// are kept with their start clamped to zero. Cues are numbered serially from
/// 1 after dropping.
pub fn generate_srt(captions: &[TranscriptSegment], clip_start_time: f64) -> String {
    let mut srt_content = String::new();
    let mut counter = 1;

    for caption in captions {
        let rel_start = caption.start - clip_start_time;
        let rel_end = rel_start + caption.duration;

        // Ends before the clip starts
        if rel_end < 0.0 {
            continue;
        }

        let rel_start = rel_start.max(0.0);

        srt_content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            counter,
            format_timestamp(rel_start),
            format_timestamp(rel_end),
            caption.text
        ));
        counter += 1;
    }

    srt_content
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, start: f64, duration: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            duration,
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_timestamp(65.125), "00:01:05,125");
        assert_eq!(format_timestamp(3661.0), "01:01:01,000");
    }

    #[test]
    fn test_format_timestamp_truncates_milliseconds() {
        assert_eq!(format_timestamp(1.9999), "00:00:01,999");
    }

    #[test]
    fn test_format_timestamp_does_not_wrap_hours() {
        assert_eq!(format_timestamp(360000.0), "100:00:00,000");
    }

    #[test]
    fn test_zero_shift_yields_zero_start() {
        let captions = vec![entry("hello", 10.0, 2.0)];

        let srt = generate_srt(&captions, 10.0);
        assert!(srt.contains("00:00:00,000 --> 00:00:02,000"));
    }

    #[test]
    fn test_entry_ending_before_clip_is_dropped() {
        // rel_end = 5 + 3 - 10 = -2
        let captions = vec![entry("too early", 5.0, 3.0)];

        let srt = generate_srt(&captions, 10.0);
        assert!(srt.is_empty());
    }

    #[test]
    fn test_straddling_entry_is_clamped() {
        // rel_start = -2, rel_end = 3: kept, truncated at the clip start
        let captions = vec![entry("straddles", 8.0, 5.0)];

        let srt = generate_srt(&captions, 10.0);
        assert!(srt.contains("00:00:00,000 --> 00:00:03,000"));
        assert!(srt.contains("straddles"));
    }

    #[test]
    fn test_numbering_is_serial_after_drops() {
        let captions = vec![
            entry("dropped", 0.0, 1.0),
            entry("first", 12.0, 2.0),
            entry("second", 15.0, 2.0),
        ];

        let srt = generate_srt(&captions, 10.0);
        assert!(srt.starts_with("1\n"));
        assert!(srt.contains("\n\n2\n"));
        assert!(!srt.contains("dropped"));
    }

    #[test]
    fn test_srt_cue_shape() {
        let captions = vec![entry("hello world", 10.0, 2.5)];

        let srt = generate_srt(&captions, 10.0);
        assert_eq!(srt, "1\n00:00:00,000 --> 00:00:02,500\nhello world\n\n");
    }
}
