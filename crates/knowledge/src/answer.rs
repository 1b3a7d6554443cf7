//! Answer generation from a matched document.
//!
//! A thin adapter over the text generator: render the answer prompt with the
//! question and the document content, call the generator once, and attach a
//! rough certainty score.

use docmatch_core::{AppError, AppResult};
use docmatch_llm::{LlmClient, LlmRequest};
use docmatch_prompt::{build_prompt, PromptDefinition};
use serde::Serialize;
use std::collections::HashMap;

/// Phrases that mark an answer as a non-answer.
const UNCERTAINTY_PHRASES: &[&str] = &[
    "i don't know",
    "i'm not sure",
    "i cannot answer",
    "there is no information",
    "the context doesn't contain",
];

/// Words of context checked for in the answer.
const CONTEXT_CHECK_WORDS: usize = 10;

/// Answers shorter than this are considered thin.
const MIN_CONFIDENT_WORDS: usize = 10;

/// Generated answer plus a heuristic confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub certainty: f32,
    pub model: String,
}

/// Ask the generator to answer `question` from `context`.
pub async fn generate_answer(
    client: &dyn LlmClient,
    prompt: &PromptDefinition,
    model: &str,
    question: &str,
    context: &str,
) -> AppResult<Answer> {
    tracing::debug!(
        "Generating answer with {} (model: {})",
        client.provider_name(),
        model
    );

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("context".to_string(), context.to_string());
    let built = build_prompt(prompt, variables)?;

    let mut request = LlmRequest::new(built.user, model)
        .with_temperature(0.3)
        .with_max_tokens(1000);
    if let Some(system) = built.system {
        request = request.with_system(system);
    }

    let response = client
        .complete(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Answer generation failed: {}", e)))?;

    let answer = response.content.trim().to_string();
    let confidence = certainty(&answer, context);
    tracing::info!("Generated answer ({} chars, certainty {:.1})", answer.len(), confidence);

    Ok(Answer {
        answer,
        certainty: confidence,
        model: response.model,
    })
}

/// Heuristic certainty of an answer given the context it was built from.
pub fn certainty(answer: &str, context: &str) -> f32 {
    let lowered = answer.to_lowercase();

    if UNCERTAINTY_PHRASES.iter().any(|p| lowered.contains(p)) {
        return 0.3;
    }

    if answer.split_whitespace().count() < MIN_CONFIDENT_WORDS {
        return 0.5;
    }

    // case-sensitive: "Install" in the context does not ground "install"
    let grounded = context
        .split_whitespace()
        .take(CONTEXT_CHECK_WORDS)
        .any(|word| answer.contains(word));
    if grounded {
        0.8
    } else {
        0.6
    }
}
