//! Command handlers for the docqa CLI.

pub mod ask;
pub mod ingest;

pub use ask::AskCommand;
pub use ingest::IngestCommand;

use docqa_core::{config::AppConfig, AppResult};
use docqa_knowledge::{create_provider, InMemoryVectorStore, RagConfig};
use std::sync::Arc;

/// Build an empty vector store with the configured embedding provider.
async fn build_store(config: &AppConfig, rag: &RagConfig) -> AppResult<Arc<InMemoryVectorStore>> {
    let api_key = config.resolve_api_key(&rag.embedding.provider);
    let embedder = create_provider(&rag.embedding, api_key.as_deref()).await?;

    tracing::debug!(
        "Embedding with {} ({}, {} dimensions)",
        embedder.provider_name(),
        embedder.model_name(),
        embedder.dimensions()
    );

    Ok(Arc::new(
        InMemoryVectorStore::new(embedder).with_batch_size(rag.embedding.batch_size),
    ))
}

/// Collection id given on the command line, or a fresh one.
fn collection_id(requested: Option<&str>) -> String {
    requested
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
