//! Account registry and document-type detection.
//!
//! An account is a keyword fingerprint plus a base archive directory. The
//! registry resolves which account, if any, owns a filename; registration
//! order is the tie-break when several accounts would match.

use serde::{Deserialize, Serialize};

/// A registered owner/bank identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account number, always part of the keyword fingerprint.
    pub account_number: String,

    /// Keywords used to identify the account in filenames.
    pub keywords: Vec<String>,

    /// Base archive directory as a `/`-separated template,
    /// e.g. `Owner/Bankname/2782161234`.
    pub directory: String,

    /// Extra filename tail appended as `-{suffix}` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_suffix: Option<String>,

    /// Accounts that do not want a trailing year folder.
    #[serde(default)]
    pub skip_year_breakdown: bool,
}

impl Account {
    /// The directory template split into ordered path segments.
    pub fn directory_segments(&self) -> Vec<String> {
        self.directory
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

/// Which keyword predicate the registry applies against a filename.
///
/// `AllKeywords` is the default: every keyword must appear as a substring.
/// `AnyKeyword` is the looser strictness mode; it produces more matches on
/// filenames with several embedded account numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPolicy {
    #[default]
    AllKeywords,
    AnyKeyword,
}

/// Holds known accounts and resolves which one matches a filename.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
    policy: MatchPolicy,
}

impl AccountRegistry {
    /// Build a registry. Each account's own number is folded into its
    /// keyword set so the fingerprint invariant holds regardless of input.
    pub fn new(accounts: Vec<Account>, policy: MatchPolicy) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|mut account| {
                if !account.keywords.contains(&account.account_number) {
                    account.keywords.push(account.account_number.clone());
                }
                account
            })
            .collect();

        Self { accounts, policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// First account whose keywords satisfy the configured predicate against
    /// the filename, in registration order. No match is not an error.
    pub fn find_match(&self, filename: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| match self.policy {
            MatchPolicy::AllKeywords => account
                .keywords
                .iter()
                .all(|keyword| filename.contains(keyword)),
            MatchPolicy::AnyKeyword => account
                .keywords
                .iter()
                .any(|keyword| filename.contains(keyword)),
        })
    }
}

/// A document category mapped to a directory segment, e.g.
/// `Kontoauszug -> Kontoauszug/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    /// Raw tag scanned for in the filename.
    pub tag: String,

    /// Directory segment appended when the tag matches.
    pub directory: String,
}

/// First document type whose tag appears in the filename, in declared order.
///
/// At most one type is detected; later (possibly longer) matches are ignored.
pub fn detect_document_type<'a>(
    filename: &str,
    types: &'a [DocumentType],
) -> Option<&'a DocumentType> {
    types.iter().find(|ty| filename.contains(&ty.tag))
}
