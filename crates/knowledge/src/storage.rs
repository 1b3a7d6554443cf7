//! File helpers shared by the document, keyword and suggestion stores.

use docmatch_core::{AppError, AppResult};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Check that `name` can be used as a single file stem.
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput("name cannot be empty".to_string()));
    }
    if name.starts_with('.') {
        return Err(AppError::InvalidInput(format!(
            "name cannot start with '.': {:?}",
            name
        )));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(AppError::InvalidInput(format!(
            "name cannot contain path separators: {:?}",
            name
        )));
    }
    Ok(())
}

fn temp_file_beside(path: &Path, contents: &[u8]) -> AppResult<tempfile::NamedTempFile> {
    let dir = path
        .parent()
        .ok_or_else(|| AppError::Other(format!("{:?} has no parent directory", path)))?;
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Replace `path` with `contents` via a temp file and rename, so readers
/// see either the old or the new file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> AppResult<()> {
    let tmp = temp_file_beside(path, contents)?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

/// Like [`write_atomic`] but never replaces an existing file.
///
/// Returns `false` if `path` already existed.
pub fn write_new_atomic(path: &Path, contents: &[u8]) -> AppResult<bool> {
    let tmp = temp_file_beside(path, contents)?;
    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(AppError::Io(e.error)),
    }
}

/// An exclusive marker file, removed when the guard drops.
///
/// Creation uses `create_new`, so at most one holder exists across every
/// process sharing the directory.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    /// Take the lock at `path`, or `None` if someone else holds it.
    pub fn try_acquire(path: impl Into<PathBuf>) -> AppResult<Option<Self>> {
        let path = path.into();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                writeln!(file, "{}", std::process::id())?;
                Ok(Some(Self { path }))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to release lock {:?}: {}", self.path, e);
        }
    }
}
