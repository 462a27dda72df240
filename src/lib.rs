//! Classifies incoming PDF documents and files them into a normalized,
//! hierarchical archive.
//!
//! The pipeline per document: classify (account keywords, metadata, or
//! recognized text) → generate destination directory and filename →
//! serialized directory creation → collision-free path resolution →
//! create-only relocation. Failures are isolated per document under a
//! `Failed` branch; a batch always completes.

pub mod accounts;
pub mod classify;
pub mod config;
pub mod document;
pub mod error;
pub mod fsops;
pub mod inspect;
pub mod organize;
pub mod rules;

pub use accounts::{Account, AccountRegistry, DocumentType, MatchPolicy};
pub use classify::{DocumentHandler, FilingResult, HandlerDescriptor, HandlerRegistry};
pub use config::Config;
pub use document::Document;
pub use error::OrganizeError;
pub use fsops::DirectoryManager;
pub use inspect::{DocumentInspector, NullInspector, PdfTextInspector};
pub use organize::{ArchiveBranch, ArchiveLayout, BatchReport, Organizer, ProgressCallback};
