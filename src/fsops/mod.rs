//! Filesystem primitives for the filing pipeline.
//!
//! Serialized directory creation, collision-free path resolution, and
//! create-only relocation. Relocation never creates directories itself;
//! all directory creation goes through [`DirectoryManager`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::OrganizeError;

/// Serializes "create directory if absent" across concurrent workers.
///
/// The existence check and the create call form one critical section, so
/// two workers targeting the same new path cannot interleave. Created by
/// the caller and passed into the orchestrator; there is no global
/// instance.
#[derive(Debug, Default)]
pub struct DirectoryManager {
    lock: Mutex<()>,
}

impl DirectoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `path` (with intermediates) unless it already exists.
    ///
    /// An existing directory is success without modification. A path
    /// occupied by a non-directory, or any create error, is
    /// [`OrganizeError::DirectoryCreationFailed`]; reported, not retried.
    pub fn ensure_directory(&self, path: &Path) -> Result<(), OrganizeError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("directory lock was poisoned, recovering");
            poisoned.into_inner()
        });

        if path.exists() {
            if path.is_dir() {
                tracing::trace!(path = %path.display(), "directory already exists");
                return Ok(());
            }
            return Err(OrganizeError::DirectoryCreationFailed {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path is occupied by a non-directory",
                ),
            });
        }

        fs::create_dir_all(path).map_err(|source| OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "directory created");
        Ok(())
    }
}

/// Resolve a collision-free destination path.
///
/// Returns `desired` unchanged when it does not exist. Otherwise appends a
/// `.copyN` marker (N starting at 1) before the extension until an
/// unoccupied path is found. Performs existence checks only, no mutation.
pub fn resolve_unique_path(desired: &Path) -> PathBuf {
    if !desired.exists() {
        return desired.to_path_buf();
    }

    let parent = desired.parent().unwrap_or_else(|| Path::new("."));
    let stem = desired
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    let extension = desired.extension().map(|e| e.to_string_lossy().to_string());

    let mut counter = 1;
    loop {
        let name = match &extension {
            Some(ext) => format!("{stem}.copy{counter}.{ext}"),
            None => format!("{stem}.copy{counter}"),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Create-only move: fails rather than overwrite.
///
/// Tries a rename first and falls back to copy+delete across filesystems.
pub fn move_file(source: &Path, destination: &Path) -> Result<(), OrganizeError> {
    if !source.exists() {
        return Err(OrganizeError::InvalidSourceReference(source.to_path_buf()));
    }
    if destination.exists() {
        return Err(OrganizeError::DestinationExists(destination.to_path_buf()));
    }

    if fs::rename(source, destination).is_err() {
        fs::copy(source, destination)?;
        fs::remove_file(source)?;
    }
    Ok(())
}

/// Create-only copy: fails rather than overwrite. The source stays put.
pub fn copy_file(source: &Path, destination: &Path) -> Result<(), OrganizeError> {
    if !source.exists() {
        return Err(OrganizeError::InvalidSourceReference(source.to_path_buf()));
    }
    if destination.exists() {
        return Err(OrganizeError::DestinationExists(destination.to_path_buf()));
    }

    fs::copy(source, destination)?;
    Ok(())
}
