//! Vector store abstraction used by ingestion and retrieval.

pub mod memory;

pub use memory::InMemoryVectorStore;

use crate::types::{Chunk, ChunkMetadata, ScoredChunk};
use docqa_core::AppResult;

/// Equality filter on the document collection a chunk belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFilter {
    pub document_collection_id: String,
}

impl CollectionFilter {
    pub fn new(document_collection_id: impl Into<String>) -> Self {
        Self {
            document_collection_id: document_collection_id.into(),
        }
    }

    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        metadata.document_collection_id == self.document_collection_id
    }
}

/// Similarity search over stored chunks.
///
/// Implementations must be safe to query concurrently.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Store chunks, returning how many were newly added.
    async fn add_chunks(&self, chunks: &[Chunk]) -> AppResult<usize>;

    /// Top `k` chunks for `query` within the filter, scored, most relevant first.
    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
        filter: &CollectionFilter,
    ) -> AppResult<Vec<ScoredChunk>>;

    /// Top `k` chunks for `query` within the filter, most relevant first.
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        filter: &CollectionFilter,
    ) -> AppResult<Vec<Chunk>> {
        let scored = self.similarity_search_with_score(query, k, filter).await?;
        Ok(scored.into_iter().map(|s| s.chunk).collect())
    }
}
