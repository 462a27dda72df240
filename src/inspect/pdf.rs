//! Pure-Rust PDF text inspector backed by `pdf-extract`.
//!
//! Works out of the box without Tesseract, pdfium, or any other system
//! libraries. Scanned/image-only PDFs yield no fragments; callers that
//! need OCR or Info-dictionary metadata plug in their own
//! [`DocumentInspector`](super::DocumentInspector).

use std::collections::BTreeSet;
use std::path::Path;

use super::{DocumentAttributes, DocumentInspector};

/// Text inspector using `pdf-extract` page extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextInspector;

impl PdfTextInspector {
    pub fn new() -> Self {
        Self
    }

    /// Split page text into trimmed, non-empty line fragments.
    fn fragments(pages: &[String]) -> BTreeSet<String> {
        pages
            .iter()
            .flat_map(|page| page.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl DocumentInspector for PdfTextInspector {
    /// The pure-Rust extractor exposes no Info dictionary; metadata-driven
    /// handlers need a caller-supplied inspector.
    fn attributes(&self, _path: &Path) -> Option<DocumentAttributes> {
        None
    }

    fn recognized_text(&self, path: &Path, first_page_only: bool) -> BTreeSet<String> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read document");
                return BTreeSet::new();
            }
        };

        // The pdf_extract crate (and its font parsing) can panic on certain
        // malformed glyphs; a panic is still just "no observations".
        let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })) {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "text extraction failed");
                return BTreeSet::new();
            }
            Err(_) => {
                tracing::warn!(path = %path.display(), "text extraction panicked");
                return BTreeSet::new();
            }
        };

        let scope = if first_page_only {
            &pages[..pages.len().min(1)]
        } else {
            &pages[..]
        };

        Self::fragments(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unreadable_document_yields_no_observations() {
        let inspector = PdfTextInspector::new();
        let fragments = inspector.recognized_text(Path::new("/nonexistent/x.pdf"), true);
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_garbage_bytes_yield_no_observations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.pdf");
        fs::write(&path, b"%PDF-1.4 but not actually a pdf body").unwrap();

        let inspector = PdfTextInspector::new();
        assert!(inspector.recognized_text(&path, false).is_empty());
    }

    #[test]
    fn test_fragments_are_trimmed_and_deduplicated() {
        let pages = vec![
            "  Invoice 42  \nACME Corp\n\nInvoice 42".to_string(),
            "ACME Corp\nTotal: 10 EUR".to_string(),
        ];

        let fragments = PdfTextInspector::fragments(&pages);
        assert_eq!(fragments.len(), 3);
        assert!(fragments.contains("Invoice 42"));
        assert!(fragments.contains("ACME Corp"));
        assert!(fragments.contains("Total: 10 EUR"));
    }
}
