//! Loaded document handle.
//!
//! A `Document` is the per-batch unit of work: an on-disk PDF that passed
//! the basic type/format check, with its filename pre-split for the
//! classification strategies.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::OrganizeError;
use crate::rules::directory::filename_stem;

/// Leading bytes every PDF starts with.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// A document admitted into the filing pipeline.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    file_name: String,
    stem: String,
    extension: String,
}

impl Document {
    /// Load a document, verifying extension and magic bytes.
    ///
    /// Anything that fails the format check (wrong extension, missing
    /// file, non-PDF content) is [`OrganizeError::NotADocument`].
    pub fn load(path: &Path) -> Result<Self, OrganizeError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .ok_or_else(|| OrganizeError::NotADocument(path.to_path_buf()))?;
        if extension != "pdf" {
            return Err(OrganizeError::NotADocument(path.to_path_buf()));
        }

        let mut magic = [0u8; PDF_MAGIC.len()];
        let read_ok = File::open(path)
            .and_then(|mut file| file.read_exact(&mut magic))
            .is_ok();
        if !read_ok || &magic[..] != PDF_MAGIC {
            return Err(OrganizeError::NotADocument(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| OrganizeError::NotADocument(path.to_path_buf()))?;
        let stem = filename_stem(&file_name);

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            stem,
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Original filename including extension.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Filename with the extension removed.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Lowercased extension, `pdf` for everything that loads today.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}
