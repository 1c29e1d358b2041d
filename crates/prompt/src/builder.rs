//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use faqbot_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Both the system and the user template are rendered with the same
/// variables. Variables are inserted verbatim (no HTML escaping); missing
/// variables render as empty strings.
///
/// # Example
/// ```no_run
/// use faqbot_prompt::{build_prompt, PromptDefinition};
/// use std::collections::HashMap;
///
/// # fn example(def: PromptDefinition) -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "授業時間は一コマどのくらいですか".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let registry = registry();

    let system = definition
        .system
        .as_deref()
        .map(|template| render_template(&registry, template, &variables))
        .transpose()?;
    let user = render_template(&registry, &definition.template, &variables)?;

    Ok(BuiltPrompt::new(
        system,
        user,
        definition.id.clone(),
        variables,
    ))
}

fn registry() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
}

/// Render a Handlebars template with variables.
fn render_template(
    handlebars: &Handlebars<'_>,
    template: &str,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    handlebars
        .render_template(template, variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// Check that a template parses, without rendering it.
pub(crate) fn check_template(template: &str) -> AppResult<()> {
    let mut handlebars = registry();
    handlebars
        .register_template_string("check", template)
        .map_err(|e| AppError::Prompt(format!("Invalid template: {}", e)))
}
