//! Contextual compression: trim a retrieved chunk to the spans relevant to
//! the question.

use crate::rag::{deterministic_request, render_prompt};
use crate::types::Chunk;
use async_trait::async_trait;
use docqa_core::AppResult;
use docqa_llm::LlmClient;
use docqa_prompt::EXTRACT_PROMPT_ID;
use std::sync::Arc;

/// Model reply meaning "nothing in this chunk is relevant".
pub const NO_OUTPUT: &str = "NO_OUTPUT";

/// Reduces a chunk to the parts that answer a query.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// `None` drops the chunk from the results.
    async fn extract_relevant(&self, chunk: &Chunk, query: &str) -> AppResult<Option<Chunk>>;
}

/// Extractor that asks a language model to copy out relevant spans.
pub struct LlmExtractor {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl LlmExtractor {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }
}

/// Interpret an extraction reply; empty and `NO_OUTPUT` mean nothing relevant.
fn parse_extraction(reply: &str) -> Option<&str> {
    let trimmed = reply.trim();
    if trimmed.is_empty() || trimmed == NO_OUTPUT {
        None
    } else {
        Some(trimmed)
    }
}

#[async_trait]
impl Extractor for LlmExtractor {
    async fn extract_relevant(&self, chunk: &Chunk, query: &str) -> AppResult<Option<Chunk>> {
        let prompt = render_prompt(
            EXTRACT_PROMPT_ID,
            &[("question", query), ("context", chunk.content.as_str())],
        )?;
        let response = self
            .llm
            .complete(&deterministic_request(prompt, &self.model))
            .await?;

        Ok(parse_extraction(&response.content).map(|text| chunk.with_content(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::testing::ScriptedLlm;
    use crate::types::ChunkMetadata;
    use docqa_core::AppError;

    fn chunk() -> Chunk {
        Chunk::new(
            "Rent is due on the 1st. Pets are not allowed.",
            ChunkMetadata::new("c", "lease.pdf", Some(4)),
        )
    }

    #[tokio::test]
    async fn test_extracted_text_keeps_metadata() {
        let llm = Arc::new(ScriptedLlm::replying("  Rent is due on the 1st.\n"));
        let extractor = LlmExtractor::new(llm.clone(), "m");

        let result = extractor
            .extract_relevant(&chunk(), "When is rent due?")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.content, "Rent is due on the 1st.");
        assert_eq!(result.metadata, chunk().metadata);

        let prompt = &llm.requests()[0].prompt;
        assert!(prompt.contains("> Question: When is rent due?"));
        assert!(prompt.contains("Pets are not allowed."));
        assert_eq!(llm.requests()[0].temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_no_output_drops_chunk() {
        let extractor = LlmExtractor::new(Arc::new(ScriptedLlm::replying(" NO_OUTPUT ")), "m");
        assert!(extractor
            .extract_relevant(&chunk(), "q")
            .await
            .unwrap()
            .is_none());

        let extractor = LlmExtractor::new(Arc::new(ScriptedLlm::replying("")), "m");
        assert!(extractor
            .extract_relevant(&chunk(), "q")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let extractor = LlmExtractor::new(Arc::new(ScriptedLlm::failing()), "m");

        let result = extractor.extract_relevant(&chunk(), "q").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[test]
    fn test_parse_extraction() {
        assert_eq!(parse_extraction("NO_OUTPUT"), None);
        assert_eq!(parse_extraction("\n\n"), None);
        assert_eq!(parse_extraction(" text "), Some("text"));
        assert_eq!(
            parse_extraction("NO_OUTPUT is mentioned here"),
            Some("NO_OUTPUT is mentioned here")
        );
    }
}
