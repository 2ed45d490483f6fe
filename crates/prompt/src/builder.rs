//! Prompt builder for rendering templates and injecting retrieved context.

use crate::types::{BuiltPrompt, PromptDefinition};
use archimind_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Template variable holding the retrieved context.
pub const CONTEXT_VAR: &str = "context";

/// Build a prompt from a definition and input variables.
///
/// When the `context` variable is missing or blank, the definition's
/// `emptyContext` text is substituted before rendering.
///
/// # Example
/// ```no_run
/// use archimind_prompt::{build_prompt, PromptDefinition};
/// use std::collections::HashMap;
///
/// # fn example(def: PromptDefinition) -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("prompt".to_string(), "Write a FastAPI endpoint".to_string());
/// vars.insert("context".to_string(), String::new());
///
/// let built = build_prompt(&def, vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    mut variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let context_is_empty = variables
        .get(CONTEXT_VAR)
        .map(|ctx| ctx.trim().is_empty())
        .unwrap_or(true);

    let empty_context_used = context_is_empty && definition.empty_context.is_some();
    if let (true, Some(placeholder)) = (context_is_empty, &definition.empty_context) {
        tracing::debug!("No retrieved context, using placeholder");
        variables.insert(CONTEXT_VAR.to_string(), placeholder.clone());
    }

    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(
        definition.system.clone(),
        user,
        definition.id.clone(),
        empty_context_used,
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text prompts, so no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
