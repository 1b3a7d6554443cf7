//! Per-document keyword persistence.
//!
//! One file per document: `<dir>/<name>.json`, holding a bare JSON list.
//! Older files wrapped the list as `{"keywords": [...]}`; both shapes are
//! read, only the bare list is written.

use super::KeywordSet;
use crate::storage::{validate_name, write_atomic};
use docmatch_core::AppResult;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// On-disk shapes of a keyword file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredKeywords {
    Bare(Vec<String>),
    Wrapped { keywords: Vec<String> },
}

impl StoredKeywords {
    /// Decode a keyword file body.
    pub fn decode(contents: &str) -> AppResult<KeywordSet> {
        let stored: StoredKeywords = serde_json::from_str(contents)?;
        Ok(stored.into_keyword_set())
    }

    pub fn into_keyword_set(self) -> KeywordSet {
        match self {
            StoredKeywords::Bare(tokens) | StoredKeywords::Wrapped { keywords: tokens } => {
                KeywordSet::from_tokens(tokens)
            }
        }
    }
}

/// Keyword files for every document.
#[derive(Debug, Clone)]
pub struct KeywordStore {
    dir: PathBuf,
}

impl KeywordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.json", name)))
    }

    /// Replace the keyword set stored for `name`.
    pub fn save(&self, name: &str, keywords: &KeywordSet) -> AppResult<()> {
        let path = self.path_for(name)?;
        let body = serde_json::to_string_pretty(keywords)?;
        write_atomic(&path, body.as_bytes())?;

        tracing::debug!("Saved {} keywords for '{}'", keywords.len(), name);
        Ok(())
    }

    /// Load the keyword set for `name`; empty when none was ever saved.
    pub fn load(&self, name: &str) -> AppResult<KeywordSet> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(KeywordSet::new());
        }

        let contents = std::fs::read_to_string(&path)?;
        StoredKeywords::decode(&contents)
    }
}
