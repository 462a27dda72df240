//! Metadata strategy.
//!
//! Claims a document when its declared author attribute equals the
//! handler's author tag and a creation timestamp is present. The new
//! filename comes directly from that timestamp (no month shift) plus the
//! account number extracted from the original filename. Filed under the
//! `Converted` branch.

use regex::Regex;

use crate::document::Document;
use crate::error::OrganizeError;
use crate::inspect::DocumentInspector;
use crate::organize::layout::ArchiveBranch;
use crate::rules::ArchiveMonth;

use super::{account_tail, DocumentHandler, FilingResult, HandlerDescriptor};

pub struct AuthorHandler {
    id: String,
    author: String,
    directory_segments: Vec<String>,
    account_pattern: Option<Regex>,
}

impl AuthorHandler {
    /// Build from a descriptor; `None` when it declares no author tag.
    pub fn from_descriptor(descriptor: &HandlerDescriptor) -> Result<Option<Self>, regex::Error> {
        let Some(author) = &descriptor.author else {
            return Ok(None);
        };
        let account_pattern = descriptor
            .account_number_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        Ok(Some(Self {
            id: descriptor.id.clone(),
            author: author.clone(),
            directory_segments: descriptor.directory_segments(),
            account_pattern,
        }))
    }
}

impl DocumentHandler for AuthorHandler {
    fn name(&self) -> &str {
        &self.id
    }

    fn is_handler_for(&self, document: &Document, inspector: &dyn DocumentInspector) -> bool {
        inspector
            .attributes(document.path())
            .map(|attrs| attrs.author == self.author)
            .unwrap_or(false)
    }

    fn file_result(
        &self,
        document: &Document,
        inspector: &dyn DocumentInspector,
    ) -> Result<FilingResult, OrganizeError> {
        // Attributes can vanish between probe and filing (unreadable on
        // re-open); that is an incomplete classification, not a re-probe.
        let attrs = inspector
            .attributes(document.path())
            .filter(|attrs| attrs.author == self.author)
            .ok_or_else(|| OrganizeError::ClassificationIncomplete {
                handler: self.id.clone(),
                file: document.file_name().to_string(),
            })?;

        let account = account_tail(self.account_pattern.as_ref(), &self.id, document)?;
        let month = ArchiveMonth::of(attrs.created.date());

        Ok(FilingResult {
            branch: ArchiveBranch::Converted,
            directory_segments: self.directory_segments.clone(),
            file_name: format!("{}-{}.{}", month.label(), account, document.extension()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{DocumentAttributes, NullInspector};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct FixedAttributes(DocumentAttributes);

    impl DocumentInspector for FixedAttributes {
        fn attributes(&self, _path: &Path) -> Option<DocumentAttributes> {
            Some(self.0.clone())
        }

        fn recognized_text(&self, _path: &Path, _first_page_only: bool) -> BTreeSet<String> {
            BTreeSet::new()
        }
    }

    fn descriptor() -> HandlerDescriptor {
        HandlerDescriptor {
            id: "acme-invoices".to_string(),
            author: Some("ACME Billing".to_string()),
            search_terms: Vec::new(),
            match_first_page_only: true,
            match_full_search_term: true,
            directory: "Vendors/ACME".to_string(),
            account_number_pattern: Some(r"\d{10}".to_string()),
        }
    }

    fn acme_inspector() -> FixedAttributes {
        FixedAttributes(DocumentAttributes {
            author: "ACME Billing".to_string(),
            created: NaiveDate::from_ymd_opt(2023, 4, 12)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        })
    }

    fn write_document(dir: &TempDir, name: &str) -> Document {
        let path = dir.path().join(name);
        fs::write(&path, b"%PDF-1.4\n").unwrap();
        Document::load(&path).unwrap()
    }

    #[test]
    fn test_claims_only_on_exact_author_match() {
        let dir = TempDir::new().unwrap();
        let handler = AuthorHandler::from_descriptor(&descriptor()).unwrap().unwrap();
        let document = write_document(&dir, "Invoice-2782161234.pdf");

        assert!(handler.is_handler_for(&document, &acme_inspector()));

        let other = FixedAttributes(DocumentAttributes {
            author: "ACME".to_string(),
            created: acme_inspector().0.created,
        });
        assert!(!handler.is_handler_for(&document, &other));
        assert!(!handler.is_handler_for(&document, &NullInspector));
    }

    #[test]
    fn test_file_result_uses_unshifted_timestamp_and_pattern() {
        let dir = TempDir::new().unwrap();
        let handler = AuthorHandler::from_descriptor(&descriptor()).unwrap().unwrap();
        let document = write_document(&dir, "Invoice-2782161234.pdf");

        let result = handler.file_result(&document, &acme_inspector()).unwrap();
        assert_eq!(result.branch, ArchiveBranch::Converted);
        assert_eq!(result.directory_segments, vec!["Vendors", "ACME"]);
        assert_eq!(result.file_name, "2023-04-2782161234.pdf");
    }

    #[test]
    fn test_file_result_without_pattern_match_is_incomplete() {
        let dir = TempDir::new().unwrap();
        let handler = AuthorHandler::from_descriptor(&descriptor()).unwrap().unwrap();
        let document = write_document(&dir, "Invoice-without-number.pdf");

        let err = handler.file_result(&document, &acme_inspector()).unwrap_err();
        assert!(matches!(err, OrganizeError::ClassificationIncomplete { .. }));
    }

    #[test]
    fn test_descriptor_without_author_builds_nothing() {
        let mut descriptor = descriptor();
        descriptor.author = None;
        assert!(AuthorHandler::from_descriptor(&descriptor).unwrap().is_none());
    }
}
