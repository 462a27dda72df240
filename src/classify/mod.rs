//! Classification strategies.
//!
//! One capability interface over three concrete strategies, tried by the
//! registry in a fixed order: filename/keyword matching first (pure string
//! work), then metadata handlers (cheap attribute lookup), then
//! recognized-text handlers (extraction is the dominant cost per
//! document). The first strategy to claim ownership produces the filing
//! result; a claim that then fails to produce one is a classification
//! failure for that document, not a retry of handler selection.

pub mod author;
pub mod keyword;
pub mod text_search;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::OrganizeError;
use crate::inspect::DocumentInspector;
use crate::organize::layout::ArchiveBranch;

pub use author::AuthorHandler;
pub use keyword::KeywordHandler;
pub use text_search::TextSearchHandler;

/// Computed destination for a classified document: branch, relative
/// directory segments, and the complete new filename.
#[derive(Debug, Clone, PartialEq)]
pub struct FilingResult {
    pub branch: ArchiveBranch,
    pub directory_segments: Vec<String>,
    pub file_name: String,
}

/// Configuration for one content-specific handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerDescriptor {
    /// Unique identifier, also the filename tail when no account pattern
    /// is configured.
    pub id: String,

    /// Author tag for metadata-based ownership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Search terms for recognized-text ownership.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,

    /// Limit text recognition to the first page.
    #[serde(default = "default_true")]
    pub match_first_page_only: bool,

    /// Require a whole fragment to equal a search term; `false` accepts
    /// substring containment.
    #[serde(default = "default_true")]
    pub match_full_search_term: bool,

    /// Destination directory under the `Converted` branch, `/`-separated.
    pub directory: String,

    /// Pattern extracting the account number from the original filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number_pattern: Option<String>,
}

fn default_true() -> bool {
    true
}

impl HandlerDescriptor {
    pub(crate) fn directory_segments(&self) -> Vec<String> {
        self.directory
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

/// A classification + filing strategy.
pub trait DocumentHandler: Send + Sync {
    /// Stable name used in logs and error reports.
    fn name(&self) -> &str;

    /// Ownership probe. Must be side-effect free.
    fn is_handler_for(&self, document: &Document, inspector: &dyn DocumentInspector) -> bool;

    /// Produce the destination once ownership is established.
    fn file_result(
        &self,
        document: &Document,
        inspector: &dyn DocumentInspector,
    ) -> Result<FilingResult, OrganizeError>;
}

/// Strategies in their fixed probe order.
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn DocumentHandler>>,
}

impl HandlerRegistry {
    pub fn new(handlers: Vec<Box<dyn DocumentHandler>>) -> Self {
        Self { handlers }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Classify a document: first claiming handler wins.
    pub fn classify(
        &self,
        document: &Document,
        inspector: &dyn DocumentInspector,
    ) -> Result<FilingResult, OrganizeError> {
        for handler in &self.handlers {
            if handler.is_handler_for(document, inspector) {
                tracing::debug!(
                    handler = handler.name(),
                    file = document.file_name(),
                    "handler claimed document"
                );
                return handler.file_result(document, inspector);
            }
        }

        Err(OrganizeError::NoMatchingHandler(
            document.file_name().to_string(),
        ))
    }
}

/// Filename tail for handler-produced names: the first account-pattern
/// match in the stem, or the handler id when no pattern is configured.
pub(crate) fn account_tail(
    pattern: Option<&Regex>,
    handler: &str,
    document: &Document,
) -> Result<String, OrganizeError> {
    match pattern {
        Some(regex) => regex
            .find(document.stem())
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| OrganizeError::ClassificationIncomplete {
                handler: handler.to_string(),
                file: document.file_name().to_string(),
            }),
        None => Ok(handler.to_string()),
    }
}
