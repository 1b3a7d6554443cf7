//! Suggestions command handler.
//!
//! Review workflow for proposed document edits.

use super::engine::Engine;
use super::print_json;
use clap::{Args, Subcommand};
use docmatch_core::{config::AppConfig, AppResult};
use docmatch_knowledge::Suggestion;

/// Review proposed edits
#[derive(Args, Debug)]
pub struct SuggestionsCommand {
    #[command(subcommand)]
    pub action: SuggestionsAction,
}

#[derive(Subcommand, Debug)]
pub enum SuggestionsAction {
    /// List suggestions
    List(SuggestionsListCommand),
    /// Show one suggestion in full
    Show(SuggestionIdArgs),
    /// Apply a pending suggestion to its document
    Apply(SuggestionIdArgs),
    /// Reject a pending suggestion
    Reject(SuggestionsRejectCommand),
}

impl SuggestionsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let engine = Engine::from_config(config)?;
        match &self.action {
            SuggestionsAction::List(cmd) => cmd.execute(&engine),
            SuggestionsAction::Show(args) => {
                tracing::info!("Executing suggestions show command for '{}'", args.id);
                let suggestion = engine.ledger.get(&args.id)?;
                print_suggestion(&suggestion, args.json, true)
            }
            SuggestionsAction::Apply(args) => {
                tracing::info!("Executing suggestions apply command for '{}'", args.id);
                let suggestion = engine.ledger.apply(&args.id).await?;
                print_suggestion(&suggestion, args.json, false)
            }
            SuggestionsAction::Reject(cmd) => {
                tracing::info!("Executing suggestions reject command for '{}'", cmd.id);
                let suggestion = engine
                    .ledger
                    .reject(&cmd.id, cmd.reason.as_deref())
                    .await?;
                print_suggestion(&suggestion, cmd.json, false)
            }
        }
    }
}

/// List suggestions
#[derive(Args, Debug)]
pub struct SuggestionsListCommand {
    /// Only suggestions awaiting review
    #[arg(long)]
    pub pending: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SuggestionsListCommand {
    pub fn execute(&self, engine: &Engine) -> AppResult<()> {
        tracing::info!("Executing suggestions list command");

        let suggestions = if self.pending {
            engine.ledger.list_pending()?
        } else {
            engine.ledger.list_all()?
        };

        if self.json {
            return print_json(&suggestions);
        }

        if suggestions.is_empty() {
            println!("No suggestions");
        }
        for s in &suggestions {
            println!(
                "{}  {:<8}  {}  {}",
                s.id,
                s.status.to_string(),
                s.filename,
                s.feedback_context.lines().next().unwrap_or("")
            );
        }
        Ok(())
    }
}

/// Identifies one suggestion
#[derive(Args, Debug)]
pub struct SuggestionIdArgs {
    /// Suggestion id
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Reject a suggestion
#[derive(Args, Debug)]
pub struct SuggestionsRejectCommand {
    /// Suggestion id
    pub id: String,

    /// Why the suggestion was rejected
    #[arg(long)]
    pub reason: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn print_suggestion(suggestion: &Suggestion, json: bool, with_content: bool) -> AppResult<()> {
    if json {
        return print_json(suggestion);
    }

    println!("Suggestion: {}", suggestion.id);
    println!("Document:   {}", suggestion.filename);
    println!("Status:     {}", suggestion.status);
    println!("Created:    {}", suggestion.created_at.to_rfc3339());
    if let Some(resolved_at) = suggestion.resolved_at {
        println!("Resolved:   {}", resolved_at.to_rfc3339());
    }
    if let Some(reason) = &suggestion.rejection_reason {
        println!("Reason:     {}", reason);
    }
    if !suggestion.feedback_context.is_empty() {
        println!("Feedback:   {}", suggestion.feedback_context);
    }

    if with_content {
        println!("\n--- original\n{}", suggestion.original_content);
        println!("\n+++ suggested\n{}", suggestion.suggested_content);
    }
    Ok(())
}
