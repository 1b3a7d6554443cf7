//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
use docmatch_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// # Example
/// ```no_run
/// use docmatch_prompt::{build_prompt, builtin::builtin_prompt, KEYWORDS_PROMPT_ID};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = builtin_prompt(KEYWORDS_PROMPT_ID).unwrap();
/// let mut vars = HashMap::new();
/// vars.insert("text".to_string(), "How do I deploy?".to_string());
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

    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        system: definition.system.clone(),
        user,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            resolved_variables: variables,
        },
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text, never HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{builtin_prompt, ANSWER_PROMPT_ID, KEYWORDS_PROMPT_ID};

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("text".to_string(), "Hello, world!".to_string());

        let rendered = render_template("Text: {{text}}", &vars).unwrap();
        assert_eq!(rendered, "Text: Hello, world!");
    }

    #[test]
    fn test_markup_is_not_escaped() {
        let mut vars = HashMap::new();
        vars.insert("text".to_string(), "<b>pricing</b> & \"billing\"".to_string());

        let rendered = render_template("{{text}}", &vars).unwrap();
        assert_eq!(rendered, "<b>pricing</b> & \"billing\"");
    }

    #[test]
    fn test_build_keyword_prompt() {
        let def = builtin_prompt(KEYWORDS_PROMPT_ID).unwrap();
        let mut vars = HashMap::new();
        vars.insert("text".to_string(), "Deploying with docker compose".to_string());

        let built = build_prompt(&def, vars).unwrap();
        assert!(built.user.contains("Deploying with docker compose"));
        assert!(built.system.is_some());
        assert_eq!(built.metadata.source_prompt_id, KEYWORDS_PROMPT_ID);
    }

    #[test]
    fn test_build_answer_prompt() {
        let def = builtin_prompt(ANSWER_PROMPT_ID).unwrap();
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "How much does it cost?".to_string());
        vars.insert("context".to_string(), "Plans start at $5.".to_string());

        let built = build_prompt(&def, vars).unwrap();
        assert!(built.user.contains("Question: How much does it cost?"));
        assert!(built.user.contains("Plans start at $5."));
    }

    #[test]
    fn test_invalid_template_is_prompt_error() {
        let result = render_template("{{#if}}", &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
