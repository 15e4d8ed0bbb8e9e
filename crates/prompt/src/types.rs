//! Prompt types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Variables the template requires
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Template string with Handlebars syntax
    pub template: String,
}

/// A prompt rendered and ready for the language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Id of the definition this prompt was built from
    pub source_prompt_id: String,

    /// Rendered prompt text
    pub text: String,

    /// Variables used during rendering
    pub variables: HashMap<String, String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        source_prompt_id: String,
        text: String,
        variables: HashMap<String, String>,
    ) -> Self {
        Self {
            source_prompt_id,
            text,
            variables,
        }
    }
}
