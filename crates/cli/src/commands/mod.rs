//! Command handlers for the docmatch CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod docs;
pub mod engine;
pub mod feedback;
pub mod suggestions;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use docs::DocsCommand;
pub use feedback::FeedbackCommand;
pub use suggestions::SuggestionsCommand;

use docmatch_core::AppResult;
use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
