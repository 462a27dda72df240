//! Canonical archive filename generation.
//!
//! Produces `yyyy-MM-accountNumber`, with an extra `-suffix` tail for
//! accounts that declare one. Uses the same date rule and one-month shift
//! as directory generation.

use crate::accounts::AccountRegistry;
use crate::error::OrganizeError;
use crate::rules::date::{extract_date, shift_back_one_month};

/// Generate the new filename (without extension) for a filename stem.
///
/// Fails when no account owns the stem or when the stem carries no valid
/// trailing date: exactly the conditions under which directory generation
/// fails for a year-broken-down account.
pub fn generate(stem: &str, registry: &AccountRegistry) -> Result<String, OrganizeError> {
    let account = registry
        .find_match(stem)
        .ok_or_else(|| OrganizeError::NoMatchingAccount(stem.to_string()))?;

    let date = extract_date(stem)
        .ok_or_else(|| OrganizeError::DateExtractionFailed(stem.to_string()))?;
    let shifted = shift_back_one_month(date);

    let name = match &account.filename_suffix {
        Some(suffix) => format!("{}-{}-{}", shifted.label(), account.account_number, suffix),
        None => format!("{}-{}", shifted.label(), account.account_number),
    };

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{Account, MatchPolicy};

    fn account(suffix: Option<&str>) -> Account {
        Account {
            account_number: "2782161234".to_string(),
            keywords: vec!["Bankname".to_string(), "2782161234".to_string()],
            directory: "Owner/Bankname/2782161234".to_string(),
            filename_suffix: suffix.map(|s| s.to_string()),
            skip_year_breakdown: false,
        }
    }

    #[test]
    fn test_generate_shifted_month_and_account_number() {
        let registry = AccountRegistry::new(vec![account(None)], MatchPolicy::AllKeywords);
        let name = generate("Bankname-2782161234-Kontoauszug-20200101", &registry).unwrap();
        assert_eq!(name, "2019-12-2782161234");
    }

    #[test]
    fn test_generate_appends_account_suffix() {
        let registry = AccountRegistry::new(vec![account(Some("Depot"))], MatchPolicy::AllKeywords);
        let name = generate("Bankname-2782161234-20200715", &registry).unwrap();
        assert_eq!(name, "2020-06-2782161234-Depot");
    }

    #[test]
    fn test_generate_fails_without_date() {
        let registry = AccountRegistry::new(vec![account(None)], MatchPolicy::AllKeywords);
        let err = generate("Bankname-2782161234-Kontoauszug", &registry).unwrap_err();
        assert!(matches!(err, OrganizeError::DateExtractionFailed(_)));
    }

    #[test]
    fn test_directory_and_filename_report_same_shifted_month() {
        use crate::rules::directory;

        let registry = AccountRegistry::new(vec![account(None)], MatchPolicy::AllKeywords);
        let stem = "Bankname-2782161234-Kontoauszug-20200101";

        let name = generate(stem, &registry).unwrap();
        let segments = directory::generate(&format!("{stem}.pdf"), &registry, &[]).unwrap();

        // Filename prefix year and directory year segment agree.
        assert!(name.starts_with("2019-12"));
        assert_eq!(segments.last().unwrap(), "2019");
    }
}
