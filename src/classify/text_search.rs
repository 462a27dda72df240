//! Recognized-text strategy.
//!
//! Claims a document when recognized on-page text matches the handler's
//! search terms, scoped to the first page unless configured otherwise.
//! Under full-term matching the fragment set must intersect the search
//! terms; otherwise substring containment in any fragment suffices. Filed
//! under the `Converted` branch.

use regex::Regex;

use crate::document::Document;
use crate::error::OrganizeError;
use crate::inspect::DocumentInspector;
use crate::organize::layout::ArchiveBranch;
use crate::rules::{extract_date, ArchiveMonth};

use super::{account_tail, DocumentHandler, FilingResult, HandlerDescriptor};

pub struct TextSearchHandler {
    id: String,
    search_terms: Vec<String>,
    match_first_page_only: bool,
    match_full_search_term: bool,
    directory_segments: Vec<String>,
    account_pattern: Option<Regex>,
}

impl TextSearchHandler {
    /// Build from a descriptor; `None` when it declares no search terms.
    pub fn from_descriptor(descriptor: &HandlerDescriptor) -> Result<Option<Self>, regex::Error> {
        if descriptor.search_terms.is_empty() {
            return Ok(None);
        }
        let account_pattern = descriptor
            .account_number_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        Ok(Some(Self {
            id: descriptor.id.clone(),
            search_terms: descriptor.search_terms.clone(),
            match_first_page_only: descriptor.match_first_page_only,
            match_full_search_term: descriptor.match_full_search_term,
            directory_segments: descriptor.directory_segments(),
            account_pattern,
        }))
    }
}

impl DocumentHandler for TextSearchHandler {
    fn name(&self) -> &str {
        &self.id
    }

    fn is_handler_for(&self, document: &Document, inspector: &dyn DocumentInspector) -> bool {
        let fragments = inspector.recognized_text(document.path(), self.match_first_page_only);
        if fragments.is_empty() {
            return false;
        }

        if self.match_full_search_term {
            self.search_terms.iter().any(|term| fragments.contains(term))
        } else {
            fragments
                .iter()
                .any(|fragment| self.search_terms.iter().any(|term| fragment.contains(term)))
        }
    }

    fn file_result(
        &self,
        document: &Document,
        _inspector: &dyn DocumentInspector,
    ) -> Result<FilingResult, OrganizeError> {
        let date = extract_date(document.stem()).ok_or_else(|| {
            OrganizeError::ClassificationIncomplete {
                handler: self.id.clone(),
                file: document.file_name().to_string(),
            }
        })?;
        let month = ArchiveMonth::of(date);
        let account = account_tail(self.account_pattern.as_ref(), &self.id, document)?;

        Ok(FilingResult {
            branch: ArchiveBranch::Converted,
            directory_segments: self.directory_segments.clone(),
            file_name: format!("{}-{}.{}", month.label(), account, document.extension()),
        })
    }
}
