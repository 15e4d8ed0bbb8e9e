//! Prompt system for docqa.
//!
//! Provides the fixed prompts used by the retrieval pipeline:
//! - YAML prompt definitions compiled into the binary
//! - Handlebars template rendering with required-input checks

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{builtin_ids, load_builtin};
pub use types::{BuiltPrompt, PromptDefinition};

/// Prompt id for the hypothetical-answer query expansion.
pub const EXPAND_PROMPT_ID: &str = "rag.expand";

/// Prompt id for contextual compression of a retrieved chunk.
pub const EXTRACT_PROMPT_ID: &str = "rag.extract";

/// Prompt id for the grounded answer.
pub const ANSWER_PROMPT_ID: &str = "rag.answer";

/// Static system instruction injected into the answer prompt.
pub const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful document assistant.\n\
Answer ONLY using the provided context. If the answer is not in the context, say \"I don't know\".\n\
Be concise. Do NOT invent page numbers or facts.";
