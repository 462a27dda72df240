//! Error kinds for the filing pipeline.
//!
//! Every variant except `Io` maps to one way a single document can drop out
//! of a batch. All of them are caught at the per-document boundary and
//! converted into a copy under the `Failed` branch; none abort the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Per-document pipeline error.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Input fails the basic type/format check (extension or magic bytes).
    #[error("not a PDF document: {0}")]
    NotADocument(PathBuf),

    /// No registered account's keywords match the filename.
    #[error("no account matches filename: {0}")]
    NoMatchingAccount(String),

    /// No classification strategy claims ownership of the document.
    #[error("no handler claims document: {0}")]
    NoMatchingHandler(String),

    /// A handler claimed ownership but produced no filing result.
    #[error("handler {handler} claimed {file} but produced no filing result")]
    ClassificationIncomplete { handler: String, file: String },

    /// The filename stem carries no valid trailing `YYYYMMDD` date.
    #[error("no date found in filename stem: {0}")]
    DateExtractionFailed(String),

    /// Destination directory could not be created (or is occupied by a file).
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Relocation target is already occupied. The unique-path resolver runs
    /// before every move, so this guards against races, not normal flow.
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// Source document vanished or became unreadable before relocation.
    #[error("source document missing or unreadable: {0}")]
    InvalidSourceReference(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
