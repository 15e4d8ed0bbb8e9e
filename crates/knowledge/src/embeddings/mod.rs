//! Embedding generation for chunk and query text.
//!
//! The vector store embeds chunks at ingestion and queries at search time
//! through one provider, so both sides live in the same vector space.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
