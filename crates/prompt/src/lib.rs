//! Prompt system for docmatch.
//!
//! This crate provides:
//! - Built-in prompt definitions for keyword extraction and answering
//! - Workspace overrides from `.docmatch/prompts/<id>.yml`
//! - Handlebars template rendering

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use builtin::{ANSWER_PROMPT_ID, KEYWORDS_PROMPT_ID};
pub use loader::load_prompt;
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
