//! Filename/keyword strategy.
//!
//! Claims a document when the account registry matches its filename, then
//! delegates to the directory and filename generators. Filed under the
//! `Organized` branch.

use crate::accounts::{AccountRegistry, DocumentType};
use crate::document::Document;
use crate::error::OrganizeError;
use crate::inspect::DocumentInspector;
use crate::organize::layout::ArchiveBranch;
use crate::rules::{directory, filename};

use super::{DocumentHandler, FilingResult};

pub struct KeywordHandler {
    registry: AccountRegistry,
    types: Vec<DocumentType>,
}

impl KeywordHandler {
    pub fn new(registry: AccountRegistry, types: Vec<DocumentType>) -> Self {
        Self { registry, types }
    }
}

impl DocumentHandler for KeywordHandler {
    fn name(&self) -> &str {
        "keyword"
    }

    fn is_handler_for(&self, document: &Document, _inspector: &dyn DocumentInspector) -> bool {
        self.registry.find_match(document.file_name()).is_some()
    }

    fn file_result(
        &self,
        document: &Document,
        _inspector: &dyn DocumentInspector,
    ) -> Result<FilingResult, OrganizeError> {
        let directory_segments =
            directory::generate(document.file_name(), &self.registry, &self.types)?;
        let new_name = filename::generate(document.stem(), &self.registry)?;

        Ok(FilingResult {
            branch: ArchiveBranch::Organized,
            directory_segments,
            file_name: format!("{new_name}.{}", document.extension()),
        })
    }
}
