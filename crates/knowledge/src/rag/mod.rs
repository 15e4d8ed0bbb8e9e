//! Retrieval-augmented answering over one document collection.
//!
//! Stages run in order: query expansion, primary and secondary retrieval
//! (concurrently), merge, citation building and answer synthesis.

pub mod answer;
pub mod ask;
pub mod expand;
pub mod extract;
pub mod merge;
pub mod retrieve;
pub mod sources;

#[cfg(test)]
pub(crate) mod testing;

pub use answer::synthesize_answer;
pub use ask::RagPipeline;
pub use expand::expand_query;
pub use extract::{Extractor, LlmExtractor, NO_OUTPUT};
pub use merge::{merge_evidence, EvidenceKey, EvidenceSet};
pub use retrieve::{retrieve_compressed, retrieve_expanded};
pub use sources::{build_citations, build_context, build_snippets, build_sources, Citations};

use docqa_core::AppResult;
use docqa_llm::LlmRequest;
use std::collections::HashMap;

/// Render a built-in prompt with the given inputs.
pub(crate) fn render_prompt(id: &str, inputs: &[(&str, &str)]) -> AppResult<String> {
    let definition = docqa_prompt::load_builtin(id)?;
    let variables: HashMap<String, String> = inputs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Ok(docqa_prompt::build_prompt(&definition, variables)?.text)
}

/// Deterministic completion request used by every stage.
pub(crate) fn deterministic_request(prompt: String, model: &str) -> LlmRequest {
    LlmRequest::new(prompt, model).with_temperature(0.0)
}
