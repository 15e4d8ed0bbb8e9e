//! Built-in prompt definitions.
//!
//! The pipeline's prompts are fixed; their YAML sources ship inside the
//! binary and are parsed on demand.

use crate::types::PromptDefinition;
use docqa_core::{AppError, AppResult};

const BUILTIN_PROMPTS: &[(&str, &str)] = &[
    (
        crate::EXPAND_PROMPT_ID,
        include_str!("../prompts/rag.expand.yaml"),
    ),
    (
        crate::EXTRACT_PROMPT_ID,
        include_str!("../prompts/rag.extract.yaml"),
    ),
    (
        crate::ANSWER_PROMPT_ID,
        include_str!("../prompts/rag.answer.yaml"),
    ),
];

/// Ids of every built-in prompt.
pub fn builtin_ids() -> Vec<&'static str> {
    BUILTIN_PROMPTS.iter().map(|(id, _)| *id).collect()
}

/// Load a built-in prompt definition by id.
pub fn load_builtin(id: &str) -> AppResult<PromptDefinition> {
    let (_, source) = BUILTIN_PROMPTS
        .iter()
        .find(|(prompt_id, _)| *prompt_id == id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", id)))?;

    let definition: PromptDefinition = serde_yaml::from_str(source)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt '{}': {}", id, e)))?;

    if definition.id != id {
        return Err(AppError::Prompt(format!(
            "Prompt id mismatch: expected '{}', found '{}'",
            id, definition.id
        )));
    }

    tracing::trace!("Loaded built-in prompt: {}", id);
    Ok(definition)
}
