//! Cross-module scenarios over a temporary workspace.


use crate::documents::FsDocumentStore;
use crate::keywords::{ExtractorSettings, KeywordExtractor, KeywordStore};
use crate::matcher::MatchPolicy;
use crate::retrieval::Retriever;
use docmatch_llm::{MockClient, MockReply};
use docmatch_prompt::builtin::builtin_prompt;
use docmatch_prompt::KEYWORDS_PROMPT_ID;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Generator reply carrying the given keywords.
fn keywords_reply(tokens: &[&str]) -> MockReply {
    MockReply::Text(serde_json::json!({ "keywords": tokens }).to_string())
}

/// A retriever over `<root>/docs` and `<root>/keywords` driven by `client`.
fn retriever(root: &Path, client: Arc<MockClient>) -> Arc<Retriever> {
    let extractor = KeywordExtractor::new(
        client,
        builtin_prompt(KEYWORDS_PROMPT_ID).unwrap(),
        ExtractorSettings {
            model: "mock-model".to_string(),
            max_attempts: 3,
            timeout: Duration::from_millis(500),
        },
    )
    .unwrap();

    Arc::new(Retriever::new(
        Arc::new(FsDocumentStore::new(root.join("docs"))),
        KeywordStore::new(root.join("keywords")),
        extractor,
        MatchPolicy::default(),
    ))
}
