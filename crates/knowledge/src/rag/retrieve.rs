//! Primary and secondary retrieval.

use crate::rag::extract::Extractor;
use crate::store::{CollectionFilter, VectorStore};
use crate::types::{Chunk, ScoredChunk};
use docqa_core::AppResult;
use futures::future::try_join_all;

/// Top `k` chunks for the question, each compressed by the extractor.
///
/// Chunks the extractor finds irrelevant are dropped; store order is kept.
pub async fn retrieve_compressed(
    store: &dyn VectorStore,
    extractor: &dyn Extractor,
    question: &str,
    filter: &CollectionFilter,
    k: usize,
) -> AppResult<Vec<Chunk>> {
    let candidates = store.similarity_search(question, k, filter).await?;
    let retrieved = candidates.len();

    let extracted = try_join_all(
        candidates
            .iter()
            .map(|chunk| extractor.extract_relevant(chunk, question)),
    )
    .await?;

    let compressed: Vec<Chunk> = extracted.into_iter().flatten().collect();

    tracing::info!(
        "Primary retrieval: {} retrieved, {} kept after compression",
        retrieved,
        compressed.len()
    );
    Ok(compressed)
}

/// Top `k` scored chunks for the expanded query, keeping only those scoring
/// strictly above `threshold`.
pub async fn retrieve_expanded(
    store: &dyn VectorStore,
    expanded_query: &str,
    filter: &CollectionFilter,
    k: usize,
    threshold: f32,
) -> AppResult<Vec<ScoredChunk>> {
    let scored = store
        .similarity_search_with_score(expanded_query, k, filter)
        .await?;
    let retrieved = scored.len();

    let kept: Vec<ScoredChunk> = scored.into_iter().filter(|s| s.score > threshold).collect();

    tracing::info!(
        "Secondary retrieval: {} retrieved, {} above score {}",
        retrieved,
        kept.len(),
        threshold
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;
    use async_trait::async_trait;
    use docqa_core::AppError;

    struct FixedStore {
        results: Vec<ScoredChunk>,
    }

    #[async_trait]
    impl VectorStore for FixedStore {
        async fn add_chunks(&self, _chunks: &[Chunk]) -> AppResult<usize> {
            Ok(0)
        }

        async fn similarity_search_with_score(
            &self,
            _query: &str,
            k: usize,
            _filter: &CollectionFilter,
        ) -> AppResult<Vec<ScoredChunk>> {
            Ok(self.results.iter().take(k).cloned().collect())
        }
    }

    /// Drops chunks mentioning "noise", upper-cases the rest.
    struct ShoutingExtractor;

    #[async_trait]
    impl Extractor for ShoutingExtractor {
        async fn extract_relevant(&self, chunk: &Chunk, _query: &str) -> AppResult<Option<Chunk>> {
            if chunk.content.contains("noise") {
                return Ok(None);
            }
            Ok(Some(chunk.with_content(chunk.content.to_uppercase())))
        }
    }

    struct BrokenExtractor;

    #[async_trait]
    impl Extractor for BrokenExtractor {
        async fn extract_relevant(&self, _chunk: &Chunk, _query: &str) -> AppResult<Option<Chunk>> {
            Err(AppError::Llm("extraction failed".to_string()))
        }
    }

    fn scored(content: &str, score: f32) -> ScoredChunk {
        ScoredChunk::new(
            Chunk::new(content, ChunkMetadata::new("c", "a.pdf", Some(1))),
            score,
        )
    }

    #[tokio::test]
    async fn test_compression_drops_and_keeps_order() {
        let store = FixedStore {
            results: vec![scored("first", 0.9), scored("noise", 0.8), scored("third", 0.7)],
        };

        let chunks = retrieve_compressed(
            &store,
            &ShoutingExtractor,
            "q",
            &CollectionFilter::new("c"),
            12,
        )
        .await
        .unwrap();

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["FIRST", "THIRD"]);
    }

    #[tokio::test]
    async fn test_extraction_failure_propagates() {
        let store = FixedStore {
            results: vec![scored("first", 0.9)],
        };

        let result = retrieve_compressed(
            &store,
            &BrokenExtractor,
            "q",
            &CollectionFilter::new("c"),
            12,
        )
        .await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let store = FixedStore {
            results: vec![
                scored("high", 0.5),
                scored("boundary", 0.2),
                scored("low", 0.15),
            ],
        };

        let kept = retrieve_expanded(&store, "expanded", &CollectionFilter::new("c"), 8, 0.2)
            .await
            .unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].chunk.content, "high");
    }

    #[tokio::test]
    async fn test_secondary_respects_k() {
        let store = FixedStore {
            results: (0..20).map(|i| scored(&format!("c{}", i), 0.9)).collect(),
        };

        let kept = retrieve_expanded(&store, "expanded", &CollectionFilter::new("c"), 8, 0.2)
            .await
            .unwrap();
        assert_eq!(kept.len(), 8);
    }
}
