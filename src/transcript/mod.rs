use serde::{Deserialize, Serialize};

/// A single timed span of transcript text
///
/// Timestamps are absolute offsets into the source video. `start` and
/// `duration` are both non-negative; callers are expected to supply segments
/// in non-decreasing `start` order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    /// Segment text
    pub text: String,

    /// Start time in seconds from the beginning of the source video
    pub start: f64,

    /// Length of the segment in seconds
    pub duration: f64,
}

/// Lazy iterator over transcript chunks bounded by a character budget
///
/// Each chunk is the single-space concatenation of consecutive segment texts.
/// The budget is a flush threshold, not a hard cap: a chunk is emitted as soon
/// as appending a segment pushes the running length over the budget, so a
/// chunk may exceed the budget by up to one segment's length, and a single
/// over-budget segment still forms its own chunk. No segment text is ever
/// split across chunks.
pub struct Chunks<'a> {
    segments: std::slice::Iter<'a, TranscriptSegment>,
    budget: usize,
    done: bool,
}

impl Iterator for Chunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        let mut current = String::new();
        for segment in self.segments.by_ref() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&segment.text);

            if current.chars().count() > self.budget {
                return Some(current);
            }
        }

        self.done = true;
        if current.is_empty() {
            None
        } else {
            Some(current)
        }
    }
}

/// Group transcript segments into chunks suitable for LLM context
///
/// Character count is used as a rough proxy for the model's context window.
pub fn chunk_segments(segments: &[TranscriptSegment], budget: usize) -> Chunks<'_> {
    Chunks {
        segments: segments.iter(),
        budget,
        done: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start: 0.0,
            duration: 1.0,
        }
    }

    #[test]
    fn test_chunks_concatenate_back_to_original() {
        let segments: Vec<_> = ["the quick", "brown fox", "jumps over", "the lazy dog"]
            .iter()
            .map(|t| segment(t))
            .collect();

        let chunks: Vec<String> = chunk_segments(&segments, 15).collect();
        assert!(chunks.len() > 1);

        let rejoined = chunks.join(" ");
        let expected = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, expected);
    }

    #[test]
    fn test_budget_is_flush_threshold_not_hard_cap() {
        let segments = vec![segment("aaaa"), segment("bbbb"), segment("cccc")];

        let chunks: Vec<String> = chunk_segments(&segments, 6).collect();

        // "aaaa bbbb" crosses the budget after the second segment; "cccc"
        // forms the trailing short chunk.
        assert_eq!(chunks, vec!["aaaa bbbb".to_string(), "cccc".to_string()]);
        assert!(chunks[0].chars().count() > 6);
    }

    #[test]
    fn test_single_over_budget_segment_forms_own_chunk() {
        let segments = vec![segment("a very long segment well past the budget")];

        let chunks: Vec<String> = chunk_segments(&segments, 10).collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], segments[0].text);
    }

    #[test]
    fn test_no_boundary_splits_a_segment() {
        let segments: Vec<_> = (0..20)
            .map(|i| segment(&format!("segment-number-{}", i)))
            .collect();

        for chunk in chunk_segments(&segments, 40) {
            for piece in chunk.split(' ') {
                assert!(
                    segments.iter().any(|s| s.text == piece),
                    "chunk boundary split segment text: {:?}",
                    piece
                );
            }
        }
    }

    #[test]
    fn test_empty_transcript_yields_no_chunks() {
        let chunks: Vec<String> = chunk_segments(&[], 5000).collect();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_under_budget_transcript_yields_single_chunk() {
        let segments = vec![segment("hello"), segment("world")];

        let chunks: Vec<String> = chunk_segments(&segments, 5000).collect();
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }
}
