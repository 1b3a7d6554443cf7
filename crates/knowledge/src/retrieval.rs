//! Question-to-document retrieval and keyword maintenance on save.

use crate::documents::DocumentStore;
use crate::keywords::{KeywordExtractor, KeywordSet, KeywordStore};
use crate::matcher::{find_best_match, MatchPolicy, MatchScore};
use docmatch_core::AppResult;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Result of routing a question to a document.
///
/// `document` is `None` when nothing cleared the match policy; `content` is
/// then empty. The query keywords are always returned so callers can show
/// them or reuse them as tags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Retrieval {
    pub document: Option<String>,
    pub content: String,
    pub query_keywords: KeywordSet,
    pub score: Option<MatchScore>,
}

impl Retrieval {
    fn no_match(query_keywords: KeywordSet) -> Self {
        Self {
            document: None,
            content: String::new(),
            query_keywords,
            score: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.document.is_some()
    }
}

/// Statistics from a bulk keyword rebuild.
#[derive(Debug, Clone, Serialize)]
pub struct RebuildStats {
    /// Documents processed
    pub documents: u32,

    /// Documents whose extraction came back empty
    pub empty_sets: u32,

    /// Wall-clock duration
    pub duration_secs: f64,
}

/// Glues the extractor, the keyword store and the matcher to the documents.
pub struct Retriever {
    documents: Arc<dyn DocumentStore>,
    keywords: KeywordStore,
    extractor: KeywordExtractor,
    policy: MatchPolicy,
}

impl Retriever {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        keywords: KeywordStore,
        extractor: KeywordExtractor,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            documents,
            keywords,
            extractor,
            policy,
        }
    }

    pub fn documents(&self) -> &dyn DocumentStore {
        self.documents.as_ref()
    }

    /// Find the document that best answers `question`.
    ///
    /// A blank question has no keywords, so it is a no-match without a
    /// generator call.
    pub async fn answer_question(&self, question: &str) -> AppResult<Retrieval> {
        let question = question.trim();
        if question.is_empty() {
            tracing::info!("Blank question; nothing to route");
            return Ok(Retrieval::no_match(KeywordSet::new()));
        }

        tracing::info!("Routing question: {}", question);

        let query_keywords = self.extractor.extract(question).await;
        tracing::debug!("Query keywords: [{}]", query_keywords);

        let names = self.documents.list_names()?;
        let outcome = find_best_match(&query_keywords, &names, &self.keywords, &self.policy)?;

        let Some(outcome) = outcome else {
            return Ok(Retrieval::no_match(query_keywords));
        };

        let content = self.documents.read(&outcome.document)?;
        Ok(Retrieval {
            document: Some(outcome.document),
            content,
            query_keywords,
            score: Some(outcome.score),
        })
    }

    /// Write a document and refresh its keyword set.
    ///
    /// Keywords are extracted first and the content is written after, so a
    /// generator outage never blocks the save. An empty extraction is stored
    /// as an empty set. If the keyword write fails the previous content is
    /// put back, keeping content and keywords from the same version.
    pub async fn save_document(&self, name: &str, content: &str) -> AppResult<KeywordSet> {
        crate::storage::validate_name(name)?;
        tracing::info!("Saving document '{}' ({} bytes)", name, content.len());

        let keywords = self.extractor.extract(content).await;
        if keywords.is_empty() {
            tracing::warn!("No keywords extracted for '{}'; it will not match any question", name);
        }

        let previous = if self.documents.exists(name)? {
            Some(self.documents.read(name)?)
        } else {
            None
        };

        self.documents.write(name, content)?;
        if let Err(e) = self.keywords.save(name, &keywords) {
            tracing::error!("Failed to store keywords for '{}': {}", name, e);
            match previous {
                Some(previous) => {
                    if let Err(restore) = self.documents.write(name, &previous) {
                        tracing::error!("Failed to restore previous content of '{}': {}", name, restore);
                    }
                }
                None => tracing::warn!("'{}' is new; it stays without keywords", name),
            }
            return Err(e);
        }

        tracing::debug!("Keywords for '{}': [{}]", name, keywords);
        Ok(keywords)
    }

    /// The stored keyword set of a document.
    pub fn load_keywords(&self, name: &str) -> AppResult<KeywordSet> {
        self.keywords.load(name)
    }

    /// Re-extract and store keywords for every document, one at a time.
    pub async fn rebuild_keywords(&self) -> AppResult<RebuildStats> {
        let start = Instant::now();
        let names = self.documents.list_names()?;

        tracing::info!("Rebuilding keywords for {} documents", names.len());

        let mut documents = 0u32;
        let mut empty_sets = 0u32;
        for name in &names {
            let content = self.documents.read(name)?;
            let keywords = self.extractor.extract(&content).await;
            if keywords.is_empty() {
                tracing::warn!("No keywords extracted for '{}'", name);
                empty_sets += 1;
            }
            self.keywords.save(name, &keywords)?;
            documents += 1;
        }

        let duration = start.elapsed();
        tracing::info!(
            "Keyword rebuild completed: {} documents ({} empty) in {:.2}s",
            documents,
            empty_sets,
            duration.as_secs_f64()
        );

        Ok(RebuildStats {
            documents,
            empty_sets,
            duration_secs: duration.as_secs_f64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::FsDocumentStore;
    use crate::keywords::ExtractorSettings;
    use docmatch_core::AppError;
    use docmatch_llm::{MockClient, MockReply};
    use docmatch_prompt::builtin::builtin_prompt;
    use docmatch_prompt::KEYWORDS_PROMPT_ID;
    use std::time::Duration;
    use tempfile::TempDir;

    fn retriever(temp: &TempDir, client: Arc<MockClient>) -> Retriever {
        let extractor = KeywordExtractor::new(
            client,
            builtin_prompt(KEYWORDS_PROMPT_ID).unwrap(),
            ExtractorSettings {
                model: "mock-model".to_string(),
                max_attempts: 2,
                timeout: Duration::from_millis(200),
            },
        )
        .unwrap();

        Retriever::new(
            Arc::new(FsDocumentStore::new(temp.path().join("docs"))),
            KeywordStore::new(temp.path().join("keywords")),
            extractor,
            MatchPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_blank_question_is_a_no_match() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockClient::always(MockReply::text("{}")));
        let retriever = retriever(&temp, client.clone());

        let retrieval = retriever.answer_question("   ").await.unwrap();
        assert!(!retrieval.is_match());
        assert!(retrieval.query_keywords.is_empty());
        assert!(retrieval.score.is_none());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_keyword_write_restores_content() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("guide.md"), "v1").unwrap();
        // a plain file where the keyword directory should be
        std::fs::write(temp.path().join("keywords"), "").unwrap();

        let client = Arc::new(MockClient::always(MockReply::text(r#"{"keywords": ["guide"]}"#)));
        let retriever = retriever(&temp, client);

        assert!(retriever.save_document("guide", "v2").await.is_err());
        assert_eq!(retriever.documents().read("guide").unwrap(), "v1");
    }

    #[tokio::test]
    async fn test_save_with_empty_extraction_still_succeeds() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockClient::always(MockReply::text("no keywords here")));
        let retriever = retriever(&temp, client);

        let keywords = retriever.save_document("blank", "Some content").await.unwrap();
        assert!(keywords.is_empty());
        assert_eq!(retriever.documents().read("blank").unwrap(), "Some content");
        assert!(temp.path().join("keywords/blank.json").exists());
        assert!(retriever.load_keywords("blank").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_name_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockClient::always(MockReply::text(r#"{"keywords": ["x1"]}"#)));
        let retriever = retriever(&temp, client.clone());

        let err = retriever.save_document("../etc", "content").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_documents_means_no_match() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockClient::always(MockReply::text(r#"{"keywords": ["setup"]}"#)));
        let retriever = retriever(&temp, client);

        let retrieval = retriever.answer_question("How do I set up?").await.unwrap();
        assert!(!retrieval.is_match());
        assert_eq!(retrieval.content, "");
        assert_eq!(retrieval.query_keywords.to_strings(), vec!["setup"]);
        assert!(retrieval.score.is_none());
    }

    #[tokio::test]
    async fn test_rebuild_counts_empty_sets() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("alpha.md"), "alpha").unwrap();
        std::fs::write(docs.join("beta.md"), "beta").unwrap();

        // alpha: two failed attempts; beta: a usable reply
        let client = Arc::new(MockClient::scripted(
            vec![MockReply::text("nope"), MockReply::text("still nope")],
            MockReply::text(r#"{"keywords": ["beta"]}"#),
        ));
        let retriever = retriever(&temp, client);

        let stats = retriever.rebuild_keywords().await.unwrap();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.empty_sets, 1);
        assert!(retriever.load_keywords("alpha").unwrap().is_empty());
        assert_eq!(retriever.load_keywords("beta").unwrap().to_strings(), vec!["beta"]);
    }
}
