//! Error types for docqa.
//!
//! One enum covers every failure category in the workspace: configuration,
//! I/O, language models, knowledge (embeddings, vector store, ingestion) and
//! prompts.

use thiserror::Error;

/// Unified error type for docqa.
///
/// Collaborators raise the variant that describes them; the retrieval
/// pipeline propagates these unchanged.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Language model provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding, vector store and ingestion errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_category() {
        let err = AppError::Llm("connection refused".to_string());
        assert_eq!(err.to_string(), "LLM error: connection refused");

        let err = AppError::Knowledge("collection missing".to_string());
        assert!(err.to_string().starts_with("Knowledge error"));
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
