//! Canonical archive directory generation.
//!
//! Builds the relative destination directory for an account-matched
//! document as an ordered list of path segments:
//! `owner/bank/account[/documentType][/year]`.
//!
//! Given `NameGirokonto-2782161234-Kontoauszug-20200101.pdf` and a matching
//! account with directory `Owner/Bankname/2782161234`, the result is
//! `Owner/Bankname/2782161234/Kontoauszug/2019`, where the year comes from
//! the issue date shifted back one month.

use std::path::Path;

use crate::accounts::{detect_document_type, AccountRegistry, DocumentType};
use crate::error::OrganizeError;
use crate::rules::date::{extract_date, shift_back_one_month};

/// Generate the archive directory segments for a filename.
///
/// Fails with [`OrganizeError::NoMatchingAccount`] when no account owns the
/// filename, and with [`OrganizeError::DateExtractionFailed`] when the
/// account requires a year breakdown but the stem carries no valid date.
pub fn generate(
    filename: &str,
    registry: &AccountRegistry,
    types: &[DocumentType],
) -> Result<Vec<String>, OrganizeError> {
    let account = registry
        .find_match(filename)
        .ok_or_else(|| OrganizeError::NoMatchingAccount(filename.to_string()))?;

    let mut segments = account.directory_segments();

    if let Some(doc_type) = detect_document_type(filename, types) {
        segments.push(doc_type.directory.clone());
    }

    if account.skip_year_breakdown {
        return Ok(segments);
    }

    let stem = filename_stem(filename);
    let date = extract_date(&stem)
        .ok_or_else(|| OrganizeError::DateExtractionFailed(stem.clone()))?;
    segments.push(shift_back_one_month(date).year.to_string());

    Ok(segments)
}

/// Filename with its final extension removed.
pub(crate) fn filename_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string())
}
