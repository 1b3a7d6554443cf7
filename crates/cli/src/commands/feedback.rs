//! Feedback command handler.
//!
//! Negative feedback that carries an edited version of a document becomes
//! a pending suggestion.

use super::engine::Engine;
use super::print_json;
use clap::Args;
use docmatch_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Propose an edit to a document
#[derive(Args, Debug)]
pub struct FeedbackCommand {
    /// Document the feedback is about
    pub name: String,

    /// File holding the proposed content
    #[arg(short, long)]
    pub file: PathBuf,

    /// What was wrong with the current content
    #[arg(long, default_value = "")]
    pub context: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FeedbackCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing feedback command for '{}'", self.name);

        let suggested = std::fs::read_to_string(&self.file).map_err(|e| {
            AppError::InvalidInput(format!("Failed to read {:?}: {}", self.file, e))
        })?;

        let engine = Engine::from_config(config)?;
        let suggestion = engine
            .ledger
            .propose(&self.name, &suggested, &self.context)?;

        if self.json {
            print_json(&suggestion)
        } else {
            println!("Recorded suggestion {}", suggestion.id);
            println!("Review it with: docmatch suggestions show {}", suggestion.id);
            Ok(())
        }
    }
}
