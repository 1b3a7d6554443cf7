//! Scripted text generator for tests.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use docmatch_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One scripted generator outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the completion
    Text(String),
    /// Fail with an `AppError::Llm`
    Fail(String),
    /// Sleep, then return the text; used to trip caller timeouts
    Stall(Duration, String),
}

impl MockReply {
    pub fn text(content: impl Into<String>) -> Self {
        MockReply::Text(content.into())
    }
}

/// Mock client that plays back a queue of replies.
///
/// Once the queue is drained every call gets the fallback reply, so a
/// single-entry script behaves like a generator that always answers the
/// same way.
#[derive(Debug)]
pub struct MockClient {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    prompts: Mutex<Vec<String>>,
}

impl MockClient {
    /// A client that always returns `reply`.
    pub fn always(reply: MockReply) -> Self {
        Self::scripted(Vec::new(), reply)
    }

    /// A client that returns `replies` in order, then `fallback` forever.
    pub fn scripted(replies: Vec<MockReply>, fallback: MockReply) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Number of completion calls received so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next_reply(&self) -> MockReply {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        let content = match self.next_reply() {
            MockReply::Text(text) => text,
            MockReply::Fail(message) => return Err(AppError::Llm(message)),
            MockReply::Stall(delay, text) => {
                tokio::time::sleep(delay).await;
                text
            }
        };

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let client = MockClient::scripted(
            vec![MockReply::Fail("boom".into()), MockReply::text("first")],
            MockReply::text("rest"),
        );
        let request = LlmRequest::new("prompt", "mock-model");

        assert!(client.complete(&request).await.is_err());
        assert_eq!(client.complete(&request).await.unwrap().content, "first");
        assert_eq!(client.complete(&request).await.unwrap().content, "rest");
        assert_eq!(client.complete(&request).await.unwrap().content, "rest");
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test]
    async fn test_records_prompts() {
        let client = MockClient::always(MockReply::text("ok"));
        client
            .complete(&LlmRequest::new("one", "m"))
            .await
            .unwrap();
        client
            .complete(&LlmRequest::new("two", "m"))
            .await
            .unwrap();
        assert_eq!(client.prompts(), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(client.provider_name(), "mock");
    }
}
