//! Hypothetical-answer query expansion.

use crate::rag::{deterministic_request, render_prompt};
use docqa_core::AppResult;
use docqa_llm::LlmClient;
use docqa_prompt::EXPAND_PROMPT_ID;

/// Ask the model for a short hypothetical answer to `question`.
///
/// The text is only used as a second retrieval query; it never reaches the
/// user. Model failures propagate.
pub async fn expand_query(llm: &dyn LlmClient, model: &str, question: &str) -> AppResult<String> {
    let prompt = render_prompt(EXPAND_PROMPT_ID, &[("question", question)])?;
    let response = llm.complete(&deterministic_request(prompt, model)).await?;

    tracing::debug!(
        "Expanded query ({} chars): {}",
        response.content.len(),
        response.content
    );
    Ok(response.content)
}
