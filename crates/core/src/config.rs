//! Configuration management for docmatch.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults
//! - Config file (`.docmatch/config.yaml`)
//! - Environment variables (`DOCMATCH_*`)
//! - Command-line flags
//!
//! All engine state (keyword sets, suggestions, prompt overrides) lives
//! under `<workspace>/.docmatch/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Name of the per-workspace state directory.
pub const STATE_DIR: &str = ".docmatch";

/// Providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 1] = ["ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .docmatch/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Directory holding the markdown documents (default: `<workspace>/docs`)
    pub docs_dir: Option<PathBuf>,

    /// LLM provider used for keyword extraction and answering
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Matching and extraction policy
    pub retrieval: RetrievalConfig,

    /// Per-provider settings from config.yaml
    pub providers: HashMap<String, ProviderConfig>,
}

/// Tunables for keyword extraction and matching.
///
/// Defaults: 1 shared keyword, 10% of the query, 3 attempts, 60s per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrievalConfig {
    /// Minimum number of shared keywords for a document to qualify
    pub min_matches: usize,

    /// Minimum fraction of the query's keywords a document must contain
    pub min_ratio: f64,

    /// Generator attempts per extraction before giving up
    pub max_attempts: u32,

    /// Per-attempt generator timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            min_matches: 1,
            min_ratio: 0.1,
            max_attempts: 3,
            timeout_secs: 60,
        }
    }
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// HTTP timeout in seconds
    pub timeout: Option<u64>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    workspace: Option<WorkspaceSection>,
    retrieval: Option<RetrievalConfig>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    active_provider: String,
    #[serde(default)]
    providers: HashMap<String, ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceSection {
    docs_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            docs_dir: None,
            provider: "ollama".to_string(),
            model: "llama3.2".to_string(),
            endpoint: None,
            log_level: None,
            verbose: false,
            no_color: false,
            retrieval: RetrievalConfig::default(),
            providers: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and the environment.
    ///
    /// Environment variables:
    /// - `DOCMATCH_WORKSPACE`: Override workspace path
    /// - `DOCMATCH_CONFIG`: Path to config file
    /// - `DOCMATCH_DOCS_DIR`: Document directory
    /// - `DOCMATCH_PROVIDER`: LLM provider
    /// - `DOCMATCH_MODEL`: Model identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`AppConfig::load`], but with the workspace and config file
    /// already chosen (e.g. from command-line flags), so the right
    /// `config.yaml` gets merged.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let workspace =
            workspace.or_else(|| std::env::var_os("DOCMATCH_WORKSPACE").map(PathBuf::from));
        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var_os("DOCMATCH_CONFIG").map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.state_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        if let Ok(docs_dir) = std::env::var("DOCMATCH_DOCS_DIR") {
            config.docs_dir = Some(PathBuf::from(docs_dir));
        }

        if let Ok(provider) = std::env::var("DOCMATCH_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DOCMATCH_MODEL") {
            config.model = model;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var_os("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(docs_dir) = ws.docs_dir {
                result.docs_dir = Some(result.workspace.join(docs_dir));
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                if let Some(model) = &provider_config.model {
                    result.model = model.clone();
                }
                if let Some(endpoint) = &provider_config.endpoint {
                    result.endpoint = Some(endpoint.clone());
                }
            }
            result.providers = llm.providers;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over everything else.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        docs_dir: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(docs_dir) = docs_dir {
            self.docs_dir = Some(docs_dir);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Path to the .docmatch state directory.
    pub fn state_dir(&self) -> PathBuf {
        self.workspace.join(STATE_DIR)
    }

    /// Directory holding the markdown documents.
    pub fn docs_dir(&self) -> PathBuf {
        self.docs_dir
            .clone()
            .unwrap_or_else(|| self.workspace.join("docs"))
    }

    /// Ensure the state and document directories exist.
    pub fn ensure_dirs(&self) -> AppResult<()> {
        for dir in [self.state_dir(), self.docs_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir).map_err(|e| {
                    AppError::Config(format!("Failed to create directory {:?}: {}", dir, e))
                })?;
            }
        }
        Ok(())
    }

    /// Get the configuration for a provider, if the config file declared one.
    pub fn provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider)
    }

    /// HTTP timeout for the active provider, if configured.
    pub fn provider_timeout(&self) -> Option<std::time::Duration> {
        self.provider_config(&self.provider)
            .and_then(|pc| pc.timeout)
            .map(std::time::Duration::from_secs)
    }

    /// Validate the provider and the retrieval policy.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        let retrieval = &self.retrieval;
        if !(0.0..=1.0).contains(&retrieval.min_ratio) {
            return Err(AppError::Config(format!(
                "retrieval.minRatio must be within [0, 1], got {}",
                retrieval.min_ratio
            )));
        }
        if retrieval.max_attempts == 0 {
            return Err(AppError::Config(
                "retrieval.maxAttempts must be at least 1".to_string(),
            ));
        }
        if retrieval.timeout_secs == 0 {
            return Err(AppError::Config(
                "retrieval.timeoutSecs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
