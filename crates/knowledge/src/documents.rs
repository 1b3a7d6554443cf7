//! Raw document content storage.

use crate::storage::{validate_name, write_atomic};
use docmatch_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of stored documents.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Where document bodies live.
///
/// The engine never caches content; every read goes through here.
pub trait DocumentStore: Send + Sync {
    /// All document names, sorted.
    fn list_names(&self) -> AppResult<Vec<String>>;

    /// Read a document's content. `NotFound` when absent.
    fn read(&self, name: &str) -> AppResult<String>;

    /// Replace a document's content atomically, creating it if needed.
    fn write(&self, name: &str, content: &str) -> AppResult<()>;

    fn exists(&self, name: &str) -> AppResult<bool>;
}

/// Markdown files in a single directory: `<dir>/<name>.md`.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, DOCUMENT_EXTENSION)))
    }
}

/// Document name for a file path, if it is a visible markdown file.
fn document_name(path: &Path) -> Option<String> {
    if path.extension()?.to_str()? != DOCUMENT_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    validate_name(stem).ok()?;
    Some(stem.to_string())
}

impl DocumentStore for FsDocumentStore {
    fn list_names(&self) -> AppResult<Vec<String>> {
        if !self.dir.exists() {
            tracing::debug!("Document directory {:?} does not exist yet", self.dir);
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = entry.map_err(|e| AppError::Knowledge(format!("Failed to list documents: {}", e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = document_name(entry.path()) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> AppResult<String> {
        let path = self.path_for(name)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::document_not_found(name))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, name: &str, content: &str) -> AppResult<()> {
        let path = self.path_for(name)?;
        write_atomic(&path, content.as_bytes())?;
        tracing::debug!("Wrote {} bytes to {:?}", content.len(), path);
        Ok(())
    }

    fn exists(&self, name: &str) -> AppResult<bool> {
        Ok(self.path_for(name)?.is_file())
    }
}
