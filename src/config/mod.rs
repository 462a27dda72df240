//! Configuration: accounts, document types, and handler descriptors.
//!
//! Everything the pipeline classifies against is data, loaded from a JSON
//! file. A config that fails to load or validate is a startup error, never
//! a per-document one.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accounts::{Account, AccountRegistry, DocumentType, MatchPolicy};
use crate::classify::{
    AuthorHandler, DocumentHandler, HandlerDescriptor, HandlerRegistry, KeywordHandler,
    TextSearchHandler,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid account number pattern in handler {handler}: {source}")]
    InvalidPattern {
        handler: String,
        #[source]
        source: regex::Error,
    },
}

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub match_policy: MatchPolicy,
    pub accounts: Vec<Account>,
    pub document_types: Vec<DocumentType>,
    pub handlers: Vec<HandlerDescriptor>,
}

impl Config {
    /// Load and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Build the account registry with the configured (or overridden)
    /// match policy.
    pub fn account_registry(&self, policy_override: Option<MatchPolicy>) -> AccountRegistry {
        AccountRegistry::new(
            self.accounts.clone(),
            policy_override.unwrap_or(self.match_policy),
        )
    }

    /// Build the handler registry in its fixed probe order: keyword
    /// matching, then metadata handlers, then recognized-text handlers.
    pub fn handler_registry(
        &self,
        policy_override: Option<MatchPolicy>,
    ) -> Result<HandlerRegistry, ConfigError> {
        let mut handlers: Vec<Box<dyn DocumentHandler>> = Vec::new();

        let accounts = self.account_registry(policy_override);
        if !accounts.is_empty() {
            handlers.push(Box::new(KeywordHandler::new(
                accounts,
                self.document_types.clone(),
            )));
        }

        for descriptor in &self.handlers {
            if let Some(handler) = AuthorHandler::from_descriptor(descriptor).map_err(|source| {
                ConfigError::InvalidPattern {
                    handler: descriptor.id.clone(),
                    source,
                }
            })? {
                handlers.push(Box::new(handler));
            }
        }

        for descriptor in &self.handlers {
            if let Some(handler) =
                TextSearchHandler::from_descriptor(descriptor).map_err(|source| {
                    ConfigError::InvalidPattern {
                        handler: descriptor.id.clone(),
                        source,
                    }
                })?
            {
                handlers.push(Box::new(handler));
            }
        }

        Ok(HandlerRegistry::new(handlers))
    }
}
