//! Keyword extraction through the text generator.

use super::{decode_keywords, KeywordSet};
use docmatch_core::{AppResult, RetrievalConfig};
use docmatch_llm::{LlmClient, LlmRequest};
use docmatch_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Generator parameters for extraction.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    /// Model identifier passed to the generator
    pub model: String,

    /// Attempts before returning an empty set
    pub max_attempts: u32,

    /// Bound on each individual generator call
    pub timeout: Duration,
}

impl ExtractorSettings {
    pub fn from_config(model: impl Into<String>, retrieval: &RetrievalConfig) -> Self {
        Self {
            model: model.into(),
            max_attempts: retrieval.max_attempts.max(1),
            timeout: Duration::from_secs(retrieval.timeout_secs),
        }
    }
}

/// Turns free text into a [`KeywordSet`].
///
/// Extraction never fails: generator errors, timeouts and unusable output
/// are retried, and after the last attempt the result is an empty set.
pub struct KeywordExtractor {
    client: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    settings: ExtractorSettings,
}

impl KeywordExtractor {
    /// Create an extractor, checking that the prompt renders.
    pub fn new(
        client: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        settings: ExtractorSettings,
    ) -> AppResult<Self> {
        let extractor = Self {
            client,
            prompt,
            settings,
        };
        extractor.build_request("")?;
        Ok(extractor)
    }

    fn build_request(&self, text: &str) -> AppResult<LlmRequest> {
        let mut variables = HashMap::new();
        variables.insert("text".to_string(), text.to_string());
        let built = build_prompt(&self.prompt, variables)?;

        let mut request = LlmRequest::new(built.user, &self.settings.model)
            .with_temperature(0.1)
            .with_max_tokens(256);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        Ok(request)
    }

    /// Extract up to 32 keywords from `text`.
    pub async fn extract(&self, text: &str) -> KeywordSet {
        let request = match self.build_request(text) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Failed to build keyword prompt: {}", e);
                return KeywordSet::new();
            }
        };

        let max_attempts = self.settings.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let outcome = tokio::time::timeout(self.settings.timeout, self.client.complete(&request)).await;

            match outcome {
                Err(_) => tracing::warn!(
                    attempt,
                    max_attempts,
                    "Keyword generation timed out after {:?}",
                    self.settings.timeout
                ),
                Ok(Err(e)) => tracing::warn!(attempt, max_attempts, "Keyword generation failed: {}", e),
                Ok(Ok(response)) => {
                    let keywords = decode_keywords(&response.content);
                    if !keywords.is_empty() {
                        tracing::debug!(attempt, count = keywords.len(), "Extracted keywords: {}", keywords);
                        return keywords;
                    }
                    tracing::warn!(attempt, max_attempts, "Generator returned no usable keywords");
                    tracing::debug!("Unusable generator output: {:?}", response.content);
                }
            }
        }

        tracing::warn!(
            "Giving up on keyword extraction after {} attempts; using an empty set",
            max_attempts
        );
        KeywordSet::new()
    }
}
