//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use docqa_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Every variable listed in the definition's `inputs` must be present.
/// Values are inserted verbatim (no HTML escaping).
///
/// # Example
/// ```no_run
/// use docqa_prompt::{build_prompt, load_builtin};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = load_builtin("rag.expand")?;
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "Who signed the lease?".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::trace!("Building prompt: {}", definition.id);

    if let Some(missing) = definition
        .inputs
        .iter()
        .find(|input| !variables.contains_key(*input))
    {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' is missing input '{}'",
            definition.id, missing
        )));
    }

    let text = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(definition.id.clone(), text, variables))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text prompts, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
