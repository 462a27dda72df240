//! Document inspection capability.
//!
//! Text and metadata extraction is an external collaborator: the pipeline
//! only consumes recognized text fragments and document attributes through
//! the [`DocumentInspector`] trait. Extraction failure is "no
//! observations", never a pipeline error.

pub mod pdf;

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDateTime;

pub use pdf::PdfTextInspector;

/// Metadata attributes a document may declare.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAttributes {
    /// Declared author string.
    pub author: String,
    /// Creation timestamp.
    pub created: NaiveDateTime,
}

/// Opaque extraction capability consumed by the classification strategies.
pub trait DocumentInspector: Send + Sync {
    /// Author and creation timestamp, when the document declares both.
    fn attributes(&self, path: &Path) -> Option<DocumentAttributes>;

    /// Recognized on-page text as a deduplicated, order-insensitive set of
    /// fragments. `first_page_only` limits the scope to page one. Returns
    /// the empty set when nothing can be extracted.
    fn recognized_text(&self, path: &Path, first_page_only: bool) -> BTreeSet<String>;
}

/// Inspector that observes nothing. For keyword-only setups and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInspector;

impl DocumentInspector for NullInspector {
    fn attributes(&self, _path: &Path) -> Option<DocumentAttributes> {
        None
    }

    fn recognized_text(&self, _path: &Path, _first_page_only: bool) -> BTreeSet<String> {
        BTreeSet::new()
    }
}
