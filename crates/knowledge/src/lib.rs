//! Keyword-based document retrieval and content suggestions.
//!
//! Every document gets a short keyword fingerprint extracted by the text
//! generator. A question is fingerprinted the same way and routed to the
//! document whose keywords overlap it the most. Readers who find a document
//! lacking can propose edits, which sit in a review ledger until applied or
//! rejected.
//!
//! - [`keywords`]: extraction, decoding and per-document storage
//! - [`matcher`]: overlap scoring and selection policy
//! - [`retrieval`]: question routing and keyword refresh on save
//! - [`suggestions`]: proposal lifecycle
//! - [`answer`]: answer generation from the matched document

pub mod answer;
pub mod documents;
pub mod keywords;
pub mod matcher;
pub mod retrieval;
pub mod storage;
pub mod suggestions;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use answer::{generate_answer, Answer};
pub use documents::{DocumentStore, FsDocumentStore};
pub use keywords::{ExtractorSettings, Keyword, KeywordExtractor, KeywordSet, KeywordStore};
pub use matcher::{find_best_match, select_best, MatchOutcome, MatchPolicy, MatchScore};
pub use retrieval::{RebuildStats, Retrieval, Retriever};
pub use suggestions::{Suggestion, SuggestionLedger, SuggestionStatus};
