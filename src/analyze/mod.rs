use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub mod client;

pub use client::ProposalClient;

/// A model-proposed clip range
///
/// Produced per transcript chunk by the remote model; timestamps are `MM:SS`
/// strings exactly as the model emitted them, with no validation beyond the
/// JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipCandidate {
    /// Proposed clip start as `MM:SS`
    pub start_time: String,

    /// Proposed clip end as `MM:SS`
    pub end_time: String,

    /// Catchy title for the segment
    pub title: String,

    /// Why the model considers this segment engaging
    pub reason: String,
}

/// Trait for the remote segment-proposal call, one chunk per request
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProposeSegments: Send + Sync {
    async fn propose(&self, chunk: &str) -> Result<Vec<ClipCandidate>>;
}

/// Collect clip candidates for the first `max_chunks` transcript chunks
///
/// Chunks are submitted sequentially, awaiting each call. Failures are
/// chunk-local: a transport error or malformed response contributes an empty
/// list for that chunk and never aborts the run. Results are concatenated in
/// chunk order with no cross-chunk deduplication or overlap resolution.
pub async fn collect_candidates(
    proposer: &dyn ProposeSegments,
    chunks: impl Iterator<Item = String>,
    max_chunks: usize,
) -> Vec<ClipCandidate> {
    let mut all_candidates = Vec::new();

    for (index, chunk) in chunks.take(max_chunks).enumerate() {
        tracing::debug!("Proposing segments for chunk {} ({} chars)", index + 1, chunk.len());

        match proposer.propose(&chunk).await {
            Ok(candidates) => {
                tracing::info!("Chunk {} produced {} candidates", index + 1, candidates.len());
                all_candidates.extend(candidates);
            }
            Err(e) => {
                tracing::warn!("Chunk {} proposal failed, skipping: {:#}", index + 1, e);
            }
        }
    }

    all_candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn candidate(title: &str) -> ClipCandidate {
        ClipCandidate {
            start_time: "00:10".to_string(),
            end_time: "00:45".to_string(),
            title: title.to_string(),
            reason: "engaging".to_string(),
        }
    }

    #[tokio::test]
    async fn test_candidates_concatenate_in_chunk_order() {
        let mut proposer = MockProposeSegments::new();
        proposer
            .expect_propose()
            .with(eq("first"))
            .returning(|_| Ok(vec![candidate("a"), candidate("b")]));
        proposer
            .expect_propose()
            .with(eq("second"))
            .returning(|_| Ok(vec![candidate("c")]));

        let chunks = vec!["first".to_string(), "second".to_string()];
        let candidates = collect_candidates(&proposer, chunks.into_iter(), 3).await;

        let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failing_chunk_is_skipped_not_fatal() {
        let mut proposer = MockProposeSegments::new();
        proposer
            .expect_propose()
            .with(eq("one"))
            .returning(|_| Ok(vec![candidate("a")]));
        proposer
            .expect_propose()
            .with(eq("two"))
            .returning(|_| Err(anyhow::anyhow!("malformed JSON")));
        proposer
            .expect_propose()
            .with(eq("three"))
            .returning(|_| Ok(vec![candidate("c")]));

        let chunks = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let candidates = collect_candidates(&proposer, chunks.into_iter(), 3).await;

        let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_chunk_bound_truncates_analysis() {
        let mut proposer = MockProposeSegments::new();
        proposer
            .expect_propose()
            .times(3)
            .returning(|_| Ok(vec![candidate("x")]));

        let chunks: Vec<String> = (0..10).map(|i| format!("chunk {}", i)).collect();
        let candidates = collect_candidates(&proposer, chunks.into_iter(), 3).await;

        assert_eq!(candidates.len(), 3);
    }

    #[tokio::test]
    async fn test_no_chunks_yields_no_candidates() {
        let proposer = MockProposeSegments::new();

        let candidates = collect_candidates(&proposer, std::iter::empty(), 3).await;
        assert!(candidates.is_empty());
    }
}
