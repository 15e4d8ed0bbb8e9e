//! Brute-force in-memory vector store using cosine similarity.

use crate::embeddings::EmbeddingProvider;
use crate::store::{CollectionFilter, VectorStore};
use crate::types::{Chunk, ScoredChunk};
use async_trait::async_trait;
use docqa_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone)]
struct StoredChunk {
    id: String,
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Vector store that keeps every chunk and its embedding in memory.
///
/// Nothing is persisted. Chunks are kept in insertion order, which also
/// breaks ties between equal scores.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    embedder: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    entries: RwLock<Vec<StoredChunk>>,
}

impl InMemoryVectorStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            batch_size: DEFAULT_BATCH_SIZE,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Set how many chunks are embedded per provider call.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Number of stored chunks across all collections.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_dimensions(&self, embedding: &[f32]) -> AppResult<()> {
        if embedding.len() != self.embedder.dimensions() {
            return Err(AppError::Knowledge(format!(
                "Embedding has {} dimensions, store expects {}",
                embedding.len(),
                self.embedder.dimensions()
            )));
        }
        Ok(())
    }
}

/// Content-derived id of a chunk.
pub fn chunk_id(chunk: &Chunk) -> String {
    let mut hasher = Sha256::new();
    hasher.update(chunk.metadata.document_collection_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(chunk.metadata.filename.as_bytes());
    hasher.update([0u8]);
    if let Some(page) = chunk.metadata.page_number {
        hasher.update(page.to_le_bytes());
    }
    hasher.update([0u8]);
    hasher.update(chunk.content.as_bytes());

    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Cosine similarity; `0.0` when either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add_chunks(&self, chunks: &[Chunk]) -> AppResult<usize> {
        let existing: HashSet<String> = {
            let entries = self.entries.read().await;
            entries.iter().map(|e| e.id.clone()).collect()
        };

        let mut seen = HashSet::new();
        let fresh: Vec<(String, &Chunk)> = chunks
            .iter()
            .map(|chunk| (chunk_id(chunk), chunk))
            .filter(|(id, _)| !existing.contains(id) && seen.insert(id.clone()))
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        let mut stored = Vec::with_capacity(fresh.len());
        for batch in fresh.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|(_, c)| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(AppError::Knowledge(format!(
                    "Embedding provider returned {} vectors for {} chunks",
                    embeddings.len(),
                    batch.len()
                )));
            }

            for ((id, chunk), embedding) in batch.iter().zip(embeddings) {
                self.check_dimensions(&embedding)?;
                stored.push(StoredChunk {
                    id: id.clone(),
                    chunk: (*chunk).clone(),
                    embedding,
                });
            }
        }

        let mut entries = self.entries.write().await;
        // Another writer may have stored the same chunks meanwhile.
        let present: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        stored.retain(|s| !present.contains(s.id.as_str()));
        let added = stored.len();
        entries.extend(stored);

        tracing::debug!(
            "Stored {} chunks using {} ({})",
            added,
            self.embedder.provider_name(),
            self.embedder.model_name()
        );
        Ok(added)
    }

    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
        filter: &CollectionFilter,
    ) -> AppResult<Vec<ScoredChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        self.check_dimensions(&query_embedding)?;

        let entries = self.entries.read().await;
        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .filter(|e| filter.matches(&e.chunk.metadata))
            .map(|e| ScoredChunk::new(e.chunk.clone(), cosine_similarity(&e.embedding, &query_embedding)))
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        tracing::debug!(
            "Similarity search in '{}' returned {} chunks",
            filter.document_collection_id,
            scored.len()
        );
        Ok(scored)
    }
}
