//! Docs command handler.
//!
//! Lists, shows and saves documents, and inspects or rebuilds their
//! keyword sets.

use super::engine::Engine;
use super::print_json;
use clap::{Args, Subcommand};
use docmatch_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Manage documents and their keyword sets
#[derive(Args, Debug)]
pub struct DocsCommand {
    #[command(subcommand)]
    pub action: DocsAction,
}

#[derive(Subcommand, Debug)]
pub enum DocsAction {
    /// List documents with their stored keywords
    List(DocsListCommand),
    /// Print a document's content
    Show(DocsShowCommand),
    /// Save a document from a file and extract its keywords
    Save(DocsSaveCommand),
    /// Print a document's stored keywords
    Keywords(DocsKeywordsCommand),
    /// Re-extract keywords for every document
    Rebuild(DocsRebuildCommand),
}

impl DocsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let engine = Engine::from_config(config)?;
        match &self.action {
            DocsAction::List(cmd) => cmd.execute(&engine),
            DocsAction::Show(cmd) => cmd.execute(&engine),
            DocsAction::Save(cmd) => cmd.execute(&engine).await,
            DocsAction::Keywords(cmd) => cmd.execute(&engine),
            DocsAction::Rebuild(cmd) => cmd.execute(&engine).await,
        }
    }
}

/// List documents
#[derive(Args, Debug)]
pub struct DocsListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DocsListCommand {
    pub fn execute(&self, engine: &Engine) -> AppResult<()> {
        tracing::info!("Executing docs list command");

        let retriever = &engine.retriever;
        let names = retriever.documents().list_names()?;

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let keywords = retriever.load_keywords(&name)?;
            entries.push((name, keywords));
        }

        if self.json {
            let output: Vec<_> = entries
                .iter()
                .map(|(name, keywords)| {
                    serde_json::json!({
                        "name": name,
                        "keywords": keywords,
                    })
                })
                .collect();
            return print_json(&output);
        }

        if entries.is_empty() {
            println!("No documents found");
            return Ok(());
        }
        for (name, keywords) in &entries {
            if keywords.is_empty() {
                println!("{}  (no keywords)", name);
            } else {
                println!("{}  [{}]", name, keywords);
            }
        }
        Ok(())
    }
}

/// Show a document
#[derive(Args, Debug)]
pub struct DocsShowCommand {
    /// Document name (file name without `.md`)
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DocsShowCommand {
    pub fn execute(&self, engine: &Engine) -> AppResult<()> {
        tracing::info!("Executing docs show command for '{}'", self.name);

        let content = engine.retriever.documents().read(&self.name)?;
        if self.json {
            print_json(&serde_json::json!({
                "name": self.name,
                "content": content,
            }))
        } else {
            print!("{}", content);
            Ok(())
        }
    }
}

/// Save a document
#[derive(Args, Debug)]
pub struct DocsSaveCommand {
    /// Document name (file name without `.md`)
    pub name: String,

    /// File holding the new content
    #[arg(short, long)]
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DocsSaveCommand {
    pub async fn execute(&self, engine: &Engine) -> AppResult<()> {
        tracing::info!("Executing docs save command for '{}'", self.name);

        let content = std::fs::read_to_string(&self.file).map_err(|e| {
            AppError::InvalidInput(format!("Failed to read {:?}: {}", self.file, e))
        })?;
        let keywords = engine.retriever.save_document(&self.name, &content).await?;

        if self.json {
            print_json(&serde_json::json!({
                "name": self.name,
                "bytes": content.len(),
                "keywords": keywords,
            }))
        } else {
            println!("Saved '{}' ({} bytes)", self.name, content.len());
            if keywords.is_empty() {
                println!("No keywords could be extracted; the document will not match questions until rebuilt.");
            } else {
                println!("Keywords: {}", keywords);
            }
            Ok(())
        }
    }
}

/// Show stored keywords
#[derive(Args, Debug)]
pub struct DocsKeywordsCommand {
    /// Document name (file name without `.md`)
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DocsKeywordsCommand {
    pub fn execute(&self, engine: &Engine) -> AppResult<()> {
        tracing::info!("Executing docs keywords command for '{}'", self.name);

        let retriever = &engine.retriever;
        if !retriever.documents().exists(&self.name)? {
            return Err(AppError::document_not_found(&self.name));
        }
        let keywords = retriever.load_keywords(&self.name)?;

        if self.json {
            print_json(&keywords)
        } else {
            for keyword in keywords.iter() {
                println!("{}", keyword);
            }
            Ok(())
        }
    }
}

/// Rebuild all keyword sets
#[derive(Args, Debug)]
pub struct DocsRebuildCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DocsRebuildCommand {
    pub async fn execute(&self, engine: &Engine) -> AppResult<()> {
        tracing::info!("Executing docs rebuild command");

        let stats = engine.retriever.rebuild_keywords().await?;

        if self.json {
            print_json(&serde_json::json!({
                "documents": stats.documents,
                "emptySets": stats.empty_sets,
                "durationSecs": stats.duration_secs,
            }))
        } else {
            println!(
                "Rebuilt keywords for {} documents ({} without keywords) in {:.2}s",
                stats.documents, stats.empty_sets, stats.duration_secs
            );
            Ok(())
        }
    }
}
