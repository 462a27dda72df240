//! Naming rules: date extraction plus directory and filename generation.
//!
//! Directory and filename generation share one date rule; both shift the
//! extracted date back one calendar month and fail under the same
//! conditions, so the two names can never diverge for the same document.

pub mod date;
pub mod directory;
pub mod filename;

pub use date::{extract_date, shift_back_one_month, ArchiveMonth};
