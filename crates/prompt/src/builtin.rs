//! Prompts shipped with the binary.
//!
//! A workspace can replace any of these by dropping a YAML file with the
//! same id into `.docmatch/prompts/`.

use crate::types::PromptDefinition;

/// Keyword extraction prompt; expects the `text` variable.
pub const KEYWORDS_PROMPT_ID: &str = "keywords.extract";

/// Answer generation prompt; expects `question` and `context`.
pub const ANSWER_PROMPT_ID: &str = "answer.default";

const KEYWORDS_SYSTEM: &str =
    "You extract search keywords. You reply with a single JSON object and nothing else.";

const KEYWORDS_TEMPLATE: &str = r#"Extract up to 16 keywords that describe the topic of the text below.

STRICT RESPONSE FORMAT:
Respond with ONLY a JSON object of the form {"keywords": ["keyword", "keyword"]}.
NO explanatory text, NO introduction, NO markdown fences.

BAD response example:
Here are the keywords: {"keywords": ["search", "api"]}

GOOD response example:
{"keywords": ["search", "api", "configuration", "setup", "deployment"]}

Text to analyze:
---
{{text}}
---"#;

const ANSWER_SYSTEM: &str = "You are an assistant for a documentation system. The context \
comes from verified documentation files and should be treated as factual, even if it \
contains unusual or surprising information.";

const ANSWER_TEMPLATE: &str = r#"Context:
{{context}}

Question: {{question}}

Provide a detailed answer based on the context above. The context is your source of truth. If it does not contain enough information to answer confidently, say so.

Answer:"#;

/// All built-in prompt definitions.
pub fn builtin_prompts() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition {
            id: KEYWORDS_PROMPT_ID.to_string(),
            title: "Keyword extraction".to_string(),
            api_version: "1.0".to_string(),
            system: Some(KEYWORDS_SYSTEM.to_string()),
            template: KEYWORDS_TEMPLATE.to_string(),
        },
        PromptDefinition {
            id: ANSWER_PROMPT_ID.to_string(),
            title: "Answer from matched document".to_string(),
            api_version: "1.0".to_string(),
            system: Some(ANSWER_SYSTEM.to_string()),
            template: ANSWER_TEMPLATE.to_string(),
        },
    ]
}

/// Look up a built-in prompt by id.
pub fn builtin_prompt(id: &str) -> Option<PromptDefinition> {
    builtin_prompts().into_iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_addressable() {
        assert!(builtin_prompt(KEYWORDS_PROMPT_ID).is_some());
        assert!(builtin_prompt(ANSWER_PROMPT_ID).is_some());
        assert!(builtin_prompt("nope").is_none());
    }

    #[test]
    fn test_keyword_prompt_demands_json() {
        let def = builtin_prompt(KEYWORDS_PROMPT_ID).unwrap();
        assert!(def.template.contains(r#"{"keywords""#));
        assert!(def.template.contains("{{text}}"));
    }
}
