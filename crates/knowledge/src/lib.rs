//! Document question answering for docqa.
//!
//! Provides:
//! - Chunk model with fixed-shape metadata
//! - Embedding providers (mock trigram, Ollama, OpenAI)
//! - In-memory vector store scoped by document collection
//! - PDF and plain-text ingestion with page-aware chunking
//! - Retrieval-augmented answering with citations

pub mod config;
pub mod embeddings;
pub mod ingest;
pub mod rag;
pub mod store;
pub mod types;

pub use config::{load_config, RagConfig};
pub use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
pub use ingest::{chunk_document, extract_pdf_text, ingest_document, ingest_files, split_pages};
pub use rag::{Extractor, LlmExtractor, RagPipeline};
pub use store::{CollectionFilter, InMemoryVectorStore, VectorStore};
pub use types::{
    AnswerResult, Chunk, ChunkMetadata, IngestReport, IngestedFile, ScoredChunk, Snippet, Source,
    NO_EVIDENCE_ANSWER,
};
