//! Batch archive layout.
//!
//! One fixed root per batch (the source files' containing folder) with
//! three branches: `Organized` for account-matched documents, `Converted`
//! for handler-produced filings, `Failed` for everything that could not be
//! classified or filed. Paths are computed, never held as a node graph.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Destination branch a filing result lands under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveBranch {
    Organized,
    Converted,
}

impl ArchiveBranch {
    pub fn dir_name(&self) -> &'static str {
        match self {
            ArchiveBranch::Organized => "Organized",
            ArchiveBranch::Converted => "Converted",
        }
    }
}

/// Resolved paths of one batch's archive tree.
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn branch_dir(&self, branch: ArchiveBranch) -> PathBuf {
        self.root.join(branch.dir_name())
    }

    /// Review branch for documents that dropped out of the pipeline.
    pub fn failed(&self) -> PathBuf {
        self.root.join("Failed")
    }
}
