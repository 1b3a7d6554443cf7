//! Suggestion ledger: proposed document edits awaiting review.
//!
//! Each suggestion is one JSON file, `<dir>/<id>.json`. Lifecycle:
//!
//! ```text
//! pending --apply--> applied
//! pending --reject-> rejected
//! ```
//!
//! Applied and rejected are terminal; resolving them again is a `Conflict`
//! and leaves the record untouched.
//!
//! A resolution holds `<dir>/<id>.lock` from the pending check until the
//! record is rewritten. A caller that finds the lock taken gets a `Conflict`,
//! whether the holder is in this process or another one.

use crate::retrieval::Retriever;
use crate::storage::{validate_name, write_atomic, write_new_atomic, LockFile};
use chrono::{DateTime, Utc};
use docmatch_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Timestamp layout embedded in suggestion ids.
const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// How many suffixed ids to try when two proposals share a millisecond.
const MAX_ID_COLLISIONS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Applied,
    Rejected,
}

impl SuggestionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Applied => "applied",
            SuggestionStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// A proposed replacement for a document's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,

    /// Target document name
    pub filename: String,

    /// Document content when the suggestion was made
    pub original_content: String,

    pub suggested_content: String,

    /// Why the edit was proposed
    pub feedback_context: String,

    pub status: SuggestionStatus,

    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,

    #[serde(
        default,
        alias = "applied_at",
        alias = "rejected_at",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize_option"
    )]
    pub resolved_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Timestamps in records written before timezone-aware stamps were used
/// carry no offset; they are read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {:?}", raw)))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {:?}", raw))),
        }
    }
}

/// File-backed suggestion records plus the review workflow.
pub struct SuggestionLedger {
    dir: PathBuf,
    retriever: Arc<Retriever>,
}

impl SuggestionLedger {
    pub fn new(dir: impl Into<PathBuf>, retriever: Arc<Retriever>) -> Self {
        Self {
            dir: dir.into(),
            retriever,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    fn path_for(&self, id: &str) -> AppResult<PathBuf> {
        validate_name(id)?;
        Ok(self.dir.join(format!("{}.json", id)))
    }

    /// Record a pending edit for document `name`.
    ///
    /// The document's current content is snapshotted as `original_content`.
    pub fn propose(
        &self,
        name: &str,
        suggested_content: &str,
        feedback_context: &str,
    ) -> AppResult<Suggestion> {
        let original_content = self.retriever.documents().read(name)?;

        let created_at = Utc::now();
        let base_id = format!("{}_{}", name, created_at.format(ID_TIMESTAMP_FORMAT));
        let mut suggestion = Suggestion {
            id: base_id.clone(),
            filename: name.to_string(),
            original_content,
            suggested_content: suggested_content.to_string(),
            feedback_context: feedback_context.to_string(),
            status: SuggestionStatus::Pending,
            created_at,
            resolved_at: None,
            rejection_reason: None,
        };

        for attempt in 1..=MAX_ID_COLLISIONS {
            if attempt > 1 {
                suggestion.id = format!("{}_{}", base_id, attempt);
            }
            let body = serde_json::to_string_pretty(&suggestion)?;
            if write_new_atomic(&self.path_for(&suggestion.id)?, body.as_bytes())? {
                tracing::info!("Recorded suggestion '{}' for '{}'", suggestion.id, name);
                return Ok(suggestion);
            }
            tracing::debug!("Suggestion id '{}' taken, retrying", suggestion.id);
        }

        Err(AppError::Knowledge(format!(
            "Could not allocate a suggestion id for '{}'",
            name
        )))
    }

    /// Load one suggestion.
    pub fn get(&self, id: &str) -> AppResult<Suggestion> {
        let path = self.path_for(id)?;
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::suggestion_not_found(id));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// Every suggestion, sorted by id.
    pub fn list_all(&self) -> AppResult<Vec<Suggestion>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut suggestions = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry
                .map_err(|e| AppError::Knowledge(format!("Failed to list suggestions: {}", e)))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }

            let contents = std::fs::read_to_string(path)?;
            let suggestion: Suggestion = serde_json::from_str(&contents).map_err(|e| {
                AppError::Serialization(format!("Malformed suggestion {:?}: {}", path, e))
            })?;
            suggestions.push(suggestion);
        }

        suggestions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(suggestions)
    }

    /// Suggestions still awaiting review, sorted by id.
    pub fn list_pending(&self) -> AppResult<Vec<Suggestion>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|s| s.status == SuggestionStatus::Pending)
            .collect())
    }

    /// Take the resolution lock for `id`.
    ///
    /// Unknown ids are `NotFound`; a lock already held is a `Conflict`.
    fn lock_for_resolution(&self, id: &str) -> AppResult<LockFile> {
        let record = self.path_for(id)?;
        if !record.is_file() {
            return Err(AppError::suggestion_not_found(id));
        }

        let lock_path = self.dir.join(format!("{}.lock", id));
        LockFile::try_acquire(&lock_path)?.ok_or_else(|| {
            AppError::Conflict(format!(
                "suggestion {} is being resolved elsewhere (lock {:?})",
                id, lock_path
            ))
        })
    }

    /// Read `id` and require it to still be pending. Call with the lock held.
    fn load_pending(&self, id: &str) -> AppResult<Suggestion> {
        let suggestion = self.get(id)?;
        if suggestion.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "suggestion {} is already {}",
                id, suggestion.status
            )));
        }
        Ok(suggestion)
    }

    fn store(&self, suggestion: &Suggestion) -> AppResult<()> {
        let body = serde_json::to_string_pretty(suggestion)?;
        write_atomic(&self.path_for(&suggestion.id)?, body.as_bytes())
    }

    /// Write the suggested content to the document and mark it applied.
    ///
    /// The document save re-extracts keywords. If the save fails the
    /// suggestion stays pending.
    pub async fn apply(&self, id: &str) -> AppResult<Suggestion> {
        let _lock = self.lock_for_resolution(id)?;
        let mut suggestion = self.load_pending(id)?;

        self.retriever
            .save_document(&suggestion.filename, &suggestion.suggested_content)
            .await?;

        suggestion.status = SuggestionStatus::Applied;
        suggestion.resolved_at = Some(Utc::now());
        self.store(&suggestion)?;

        tracing::info!("Applied suggestion '{}' to '{}'", id, suggestion.filename);
        Ok(suggestion)
    }

    /// Mark a suggestion rejected without touching the document.
    pub async fn reject(&self, id: &str, reason: Option<&str>) -> AppResult<Suggestion> {
        let _lock = self.lock_for_resolution(id)?;
        let mut suggestion = self.load_pending(id)?;

        suggestion.status = SuggestionStatus::Rejected;
        suggestion.resolved_at = Some(Utc::now());
        suggestion.rejection_reason = reason.map(str::to_string);
        self.store(&suggestion)?;

        tracing::info!("Rejected suggestion '{}'", id);
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&SuggestionStatus::Applied).unwrap(),
            "\"applied\""
        );
        let status: SuggestionStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert!(status.is_terminal());
        assert!(!SuggestionStatus::Pending.is_terminal());
    }

    #[test]
    fn test_reads_legacy_record() {
        let raw = r#"{
            "id": "guide_20240501_123045",
            "filename": "guide",
            "original_content": "Step 1",
            "suggested_content": "Step 1\nStep 2",
            "feedback_context": "missing step",
            "status": "applied",
            "created_at": "2024-05-01T12:30:45.123456",
            "applied_at": "2024-05-02T08:00:00"
        }"#;

        let suggestion: Suggestion = serde_json::from_str(raw).unwrap();
        assert_eq!(suggestion.status, SuggestionStatus::Applied);
        assert_eq!(
            suggestion.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-05-01 12:30:45"
        );
        assert!(suggestion.resolved_at.is_some());
        assert!(suggestion.rejection_reason.is_none());
    }

    #[test]
    fn test_writes_canonical_record() {
        let suggestion = Suggestion {
            id: "faq_20260101_000000_000".to_string(),
            filename: "faq".to_string(),
            original_content: "a".to_string(),
            suggested_content: "b".to_string(),
            feedback_context: "c".to_string(),
            status: SuggestionStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
            rejection_reason: None,
        };

        let value = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(value["status"], "pending");
        assert!(value.get("resolved_at").is_none());

        let back: Suggestion = serde_json::from_value(value).unwrap();
        assert_eq!(back, suggestion);
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let raw = r#"{"id": "x1", "filename": "x1", "original_content": "",
            "suggested_content": "", "feedback_context": "", "status": "pending",
            "created_at": "yesterday"}"#;
        assert!(serde_json::from_str::<Suggestion>(raw).is_err());
    }
}
