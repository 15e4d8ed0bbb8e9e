//! Grounded answer synthesis.

use crate::rag::merge::EvidenceSet;
use crate::rag::sources::Citations;
use crate::rag::{deterministic_request, render_prompt};
use crate::types::AnswerResult;
use docqa_core::AppResult;
use docqa_llm::LlmClient;
use docqa_prompt::{ANSWER_PROMPT_ID, ANSWER_SYSTEM_PROMPT};

/// Produce the final answer from the evidence and its citations.
///
/// Empty evidence returns the fixed no-evidence answer without calling the
/// model. Otherwise the model is called exactly once and its reply is used
/// verbatim.
pub async fn synthesize_answer(
    llm: &dyn LlmClient,
    model: &str,
    question: &str,
    evidence: &EvidenceSet,
    citations: Citations,
) -> AppResult<AnswerResult> {
    if evidence.is_empty() {
        tracing::info!("No evidence found, returning fallback answer");
        return Ok(AnswerResult::no_evidence());
    }

    let prompt = render_prompt(
        ANSWER_PROMPT_ID,
        &[
            ("system", ANSWER_SYSTEM_PROMPT),
            ("question", question),
            ("context", citations.context.as_str()),
        ],
    )?;

    let response = llm.complete(&deterministic_request(prompt, model)).await?;

    tracing::info!(
        "Synthesized answer ({} chars, {} sources)",
        response.content.len(),
        citations.sources.len()
    );

    Ok(AnswerResult {
        answer: response.content,
        sources: citations.sources,
        snippets: citations.snippets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagConfig;
    use crate::rag::merge::merge_evidence;
    use crate::rag::sources::build_citations;
    use crate::rag::testing::ScriptedLlm;
    use crate::types::{Chunk, ChunkMetadata, NO_EVIDENCE_ANSWER};
    use docqa_core::AppError;

    fn evidence() -> EvidenceSet {
        merge_evidence(
            vec![Chunk::new(
                "Rent is due on the 1st.",
                ChunkMetadata::new("c", "lease.pdf", Some(2)),
            )],
            Vec::new(),
            8,
            120,
        )
    }

    #[tokio::test]
    async fn test_empty_evidence_skips_model() {
        let llm = ScriptedLlm::replying("should not be used");
        let empty = EvidenceSet::default();
        let citations = build_citations(&empty, &RagConfig::default());

        let result = synthesize_answer(&llm, "m", "q", &empty, citations)
            .await
            .unwrap();

        assert_eq!(result.answer, NO_EVIDENCE_ANSWER);
        assert!(result.sources.is_empty());
        assert!(result.snippets.is_empty());
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_single_call_with_fixed_prompt() {
        let llm = ScriptedLlm::replying("Rent is due on the 1st (lease.pdf p.2).");
        let evidence = evidence();
        let citations = build_citations(&evidence, &RagConfig::default());

        let result = synthesize_answer(&llm, "m", "When is rent due?", &evidence, citations)
            .await
            .unwrap();

        assert_eq!(result.answer, "Rent is due on the 1st (lease.pdf p.2).");
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.snippets[0].text, "Rent is due on the 1st.");

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(0.0));
        let prompt = &requests[0].prompt;
        assert!(prompt.starts_with("You are a helpful document assistant."));
        assert!(prompt.contains("Question: When is rent due?"));
        assert!(prompt.contains("Context:\n(lease.pdf p.2) Rent is due on the 1st."));
        assert!(prompt.ends_with("Write a precise answer in 3–6 sentences."));
    }

    #[tokio::test]
    async fn test_model_failure_is_not_fallback() {
        let llm = ScriptedLlm::failing();
        let evidence = evidence();
        let citations = build_citations(&evidence, &RagConfig::default());

        let result = synthesize_answer(&llm, "m", "q", &evidence, citations).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
