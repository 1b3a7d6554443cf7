//! Error types for docmatch.
//!
//! Not-found and conflict conditions get their own variants so callers can
//! match on them; everything else is a generic failure that propagates.

use thiserror::Error;

/// Unified error type for docmatch.
///
/// Degraded outcomes (no keywords extracted, no document matched) are not
/// errors and never appear here.
#[derive(Error, Debug)]
pub enum AppError {
    /// A named document or suggestion does not exist
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// A state transition was attempted from a terminal state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller-supplied input failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Keyword, matching and suggestion storage errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Shorthand for a missing document.
    pub fn document_not_found(name: impl Into<String>) -> Self {
        AppError::NotFound {
            kind: "document",
            name: name.into(),
        }
    }

    /// Shorthand for a missing suggestion.
    pub fn suggestion_not_found(id: impl Into<String>) -> Self {
        AppError::NotFound {
            kind: "suggestion",
            name: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = AppError::document_not_found("install");
        assert_eq!(err.to_string(), "document not found: install");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_serde_json_conversion() {
        let err: AppError = serde_json::from_str::<Vec<String>>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
