//! Wiring from configuration to the retrieval engine.

use docmatch_core::{config::AppConfig, AppError, AppResult};
use docmatch_knowledge::{
    ExtractorSettings, FsDocumentStore, KeywordExtractor, KeywordStore, MatchPolicy, Retriever,
    SuggestionLedger,
};
use docmatch_llm::{create_client, LlmClient};
use docmatch_prompt::{load_prompt, KEYWORDS_PROMPT_ID};
use std::sync::Arc;

/// Everything a command needs, built once per invocation.
pub struct Engine {
    pub client: Arc<dyn LlmClient>,
    pub retriever: Arc<Retriever>,
    pub ledger: SuggestionLedger,
}

impl Engine {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.provider_timeout(),
        )
        .map_err(AppError::Config)?;

        let prompt = load_prompt(&config.workspace, KEYWORDS_PROMPT_ID)?;
        tracing::debug!("Keyword prompt: {} ({})", prompt.id, prompt.title);

        let extractor = KeywordExtractor::new(
            client.clone(),
            prompt,
            ExtractorSettings::from_config(&config.model, &config.retrieval),
        )?;

        let state_dir = config.state_dir();
        let retriever = Arc::new(Retriever::new(
            Arc::new(FsDocumentStore::new(config.docs_dir())),
            KeywordStore::new(state_dir.join("keywords")),
            extractor,
            MatchPolicy::from(&config.retrieval),
        ));
        let ledger = SuggestionLedger::new(state_dir.join("suggestions"), retriever.clone());

        Ok(Self {
            client,
            retriever,
            ledger,
        })
    }
}
