//! Batch orchestrator.
//!
//! Drives a batch of input documents through classification, naming,
//! directory creation, collision resolution, and relocation. Documents are
//! independent units of work executed in parallel; a failure in one
//! document's pipeline parks that document under the `Failed` branch and
//! never aborts the batch. The only batch-fatal step is preparing the
//! `Failed` branch itself.

pub mod layout;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::classify::{FilingResult, HandlerRegistry};
use crate::document::Document;
use crate::error::OrganizeError;
use crate::fsops::{self, DirectoryManager};
use crate::inspect::DocumentInspector;

pub use layout::{ArchiveBranch, ArchiveLayout};

/// Progress callback, invoked with (processed, total) as documents finish.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Aggregate outcome of one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Number of input documents.
    pub total: usize,
    /// Documents relocated to their computed destination.
    pub filed_count: usize,
    /// Documents parked under the `Failed` branch (or unprocessable).
    pub failed_count: usize,
    /// One message per failed document.
    pub errors: Vec<String>,
    /// Whether every document was filed.
    pub success: bool,
}

impl BatchReport {
    fn new(total: usize, filed: usize, failed: usize, errors: Vec<String>) -> Self {
        Self {
            total,
            filed_count: filed,
            failed_count: failed,
            errors,
            success: failed == 0,
        }
    }
}

/// The batch orchestrator.
///
/// The directory manager is passed in by the caller; it is the single
/// serialization point shared by all workers.
pub struct Organizer {
    handlers: Arc<HandlerRegistry>,
    inspector: Arc<dyn DocumentInspector>,
    directories: Arc<DirectoryManager>,
}

impl Organizer {
    pub fn new(
        handlers: HandlerRegistry,
        inspector: Arc<dyn DocumentInspector>,
        directories: Arc<DirectoryManager>,
    ) -> Self {
        Self {
            handlers: Arc::new(handlers),
            inspector,
            directories,
        }
    }

    /// Classify a single document without touching the filesystem.
    pub fn classify(&self, path: &Path) -> Result<FilingResult, OrganizeError> {
        let document = Document::load(path)?;
        self.handlers.classify(&document, self.inspector.as_ref())
    }

    /// Organize a batch of documents.
    pub async fn organize(&self, inputs: Vec<PathBuf>) -> Result<BatchReport, OrganizeError> {
        self.organize_with_progress(inputs, None).await
    }

    /// Organize a batch, reporting progress after each document.
    ///
    /// The batch root is the first input's containing folder; all inputs
    /// are expected to share it. Returns an error only when the `Failed`
    /// branch cannot be prepared; everything after that is isolated
    /// per document.
    pub async fn organize_with_progress(
        &self,
        inputs: Vec<PathBuf>,
        progress: Option<Arc<ProgressCallback>>,
    ) -> Result<BatchReport, OrganizeError> {
        if inputs.is_empty() {
            return Ok(BatchReport::new(0, 0, 0, Vec::new()));
        }

        let root = inputs[0]
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let layout = ArchiveLayout::new(root);

        // Preparing the Failed branch is the one batch-fatal step.
        self.directories.ensure_directory(&layout.failed())?;

        let total = inputs.len();
        let filed = Arc::new(Mutex::new(0usize));
        let failed = Arc::new(Mutex::new(0usize));
        let errors = Arc::new(Mutex::new(Vec::<String>::new()));

        let mut handles = Vec::new();

        for path in inputs {
            let layout = layout.clone();
            let handlers = Arc::clone(&self.handlers);
            let inspector = Arc::clone(&self.inspector);
            let directories = Arc::clone(&self.directories);
            let filed = Arc::clone(&filed);
            let failed = Arc::clone(&failed);
            let errors = Arc::clone(&errors);
            let progress = progress.clone();

            let handle = tokio::spawn(async move {
                let label = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.to_string_lossy().to_string());

                let worker_path = path.clone();
                let worker_layout = layout.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    process_document(
                        &worker_path,
                        &worker_layout,
                        &handlers,
                        inspector.as_ref(),
                        &directories,
                    )
                })
                .await;

                match outcome {
                    Ok(Ok(destination)) => {
                        let mut count = filed.lock().await;
                        *count += 1;
                        tracing::debug!(
                            file = %label,
                            destination = %destination.display(),
                            "document filed"
                        );
                    }
                    Ok(Err(err)) => {
                        park_in_failed(&path, &layout, &label, &err);
                        let mut count = failed.lock().await;
                        *count += 1;
                        let mut messages = errors.lock().await;
                        messages.push(format!("{label}: {err}"));
                    }
                    Err(join_err) => {
                        tracing::warn!(file = %label, error = %join_err, "worker panicked");
                        let mut count = failed.lock().await;
                        *count += 1;
                        let mut messages = errors.lock().await;
                        messages.push(format!("{label}: worker panicked: {join_err}"));
                    }
                }

                if let Some(callback) = progress {
                    let processed = *filed.lock().await + *failed.lock().await;
                    callback(processed, total);
                }
            });

            handles.push(handle);
        }

        for handle in handles {
            if let Err(join_err) = handle.await {
                tracing::warn!(error = %join_err, "batch task panicked");
                let mut count = failed.lock().await;
                *count += 1;
                let mut messages = errors.lock().await;
                messages.push(format!("batch task panicked: {join_err}"));
            }
        }

        let filed = *filed.lock().await;
        let failed = *failed.lock().await;
        let errors = errors.lock().await.clone();

        tracing::info!(total, filed, failed, "batch complete");
        Ok(BatchReport::new(total, filed, failed, errors))
    }
}

/// One document's pipeline: load, classify, create the destination
/// directory, resolve a collision-free path, relocate.
fn process_document(
    path: &Path,
    layout: &ArchiveLayout,
    handlers: &HandlerRegistry,
    inspector: &dyn DocumentInspector,
    directories: &DirectoryManager,
) -> Result<PathBuf, OrganizeError> {
    let document = Document::load(path)?;
    let filing = handlers.classify(&document, inspector)?;

    let mut target_dir = layout.branch_dir(filing.branch);
    for segment in &filing.directory_segments {
        target_dir.push(segment);
    }
    directories.ensure_directory(&target_dir)?;

    let destination = fsops::resolve_unique_path(&target_dir.join(&filing.file_name));
    fsops::move_file(path, &destination)?;
    Ok(destination)
}

/// Copy a failed document, untouched, into the `Failed` branch under its
/// original filename (unique-resolved when that name is taken). A copy
/// failure is logged and counted with the original error, never raised.
fn park_in_failed(source: &Path, layout: &ArchiveLayout, label: &str, cause: &OrganizeError) {
    let desired = layout.failed().join(
        source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string()),
    );
    let target = fsops::resolve_unique_path(&desired);

    match fsops::copy_file(source, &target) {
        Ok(()) => {
            tracing::warn!(
                file = %label,
                error = %cause,
                parked = %target.display(),
                "document failed, parked for review"
            );
        }
        Err(copy_err) => {
            tracing::warn!(
                file = %label,
                error = %cause,
                park_error = %copy_err,
                "document failed and could not be parked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{Account, AccountRegistry, DocumentType, MatchPolicy};
    use crate::classify::{DocumentHandler, KeywordHandler};
    use crate::inspect::NullInspector;
    use std::fs;
    use tempfile::TempDir;

    fn keyword_registry() -> HandlerRegistry {
        let accounts = AccountRegistry::new(
            vec![Account {
                account_number: "2782161234".to_string(),
                keywords: vec!["Bankname".to_string(), "2782161234".to_string()],
                directory: "Owner/Bankname/2782161234".to_string(),
                filename_suffix: None,
                skip_year_breakdown: false,
            }],
            MatchPolicy::AllKeywords,
        );
        let types = vec![DocumentType {
            tag: "Kontoauszug".to_string(),
            directory: "Kontoauszug".to_string(),
        }];
        HandlerRegistry::new(vec![Box::new(KeywordHandler::new(accounts, types))])
    }

    fn organizer(handlers: HandlerRegistry) -> Organizer {
        Organizer::new(
            handlers,
            Arc::new(NullInspector),
            Arc::new(DirectoryManager::new()),
        )
    }

    #[tokio::test]
    async fn test_empty_batch_reports_success() {
        let report = organizer(keyword_registry()).organize(Vec::new()).await.unwrap();
        assert_eq!(report.total, 0);
        assert!(report.success);
    }

    #[tokio::test]
    async fn test_batch_files_matched_and_parks_unmatched() {
        let dir = TempDir::new().unwrap();
        let matched = dir.path().join("Bankname-2782161234-Kontoauszug-20200101.pdf");
        let unmatched = dir.path().join("Unknown-20200101.pdf");
        fs::write(&matched, b"%PDF-1.4\nstatement").unwrap();
        fs::write(&unmatched, b"%PDF-1.4\nmystery").unwrap();

        let report = organizer(keyword_registry())
            .organize(vec![matched.clone(), unmatched.clone()])
            .await
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.filed_count, 1);
        assert_eq!(report.failed_count, 1);
        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);

        let destination = dir
            .path()
            .join("Organized/Owner/Bankname/2782161234/Kontoauszug/2019/2019-12-2782161234.pdf");
        assert!(destination.exists());
        assert!(!matched.exists());

        // The unmatched original is preserved byte-identical under Failed.
        let parked = dir.path().join("Failed/Unknown-20200101.pdf");
        assert_eq!(fs::read(&parked).unwrap(), b"%PDF-1.4\nmystery");
        assert!(unmatched.exists());
    }

    #[tokio::test]
    async fn test_occupied_destination_gets_copy_marker() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Bankname-2782161234-Kontoauszug-20200101.pdf");
        fs::write(&input, b"%PDF-1.4\nnew").unwrap();

        let target_dir = dir
            .path()
            .join("Organized/Owner/Bankname/2782161234/Kontoauszug/2019");
        fs::create_dir_all(&target_dir).unwrap();
        fs::write(target_dir.join("2019-12-2782161234.pdf"), b"%PDF-1.4\nold").unwrap();

        let report = organizer(keyword_registry())
            .organize(vec![input])
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(
            fs::read(target_dir.join("2019-12-2782161234.copy1.pdf")).unwrap(),
            b"%PDF-1.4\nnew"
        );
        assert_eq!(
            fs::read(target_dir.join("2019-12-2782161234.pdf")).unwrap(),
            b"%PDF-1.4\nold"
        );
    }

    #[tokio::test]
    async fn test_failed_branch_preparation_is_batch_fatal() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Bankname-2782161234-Kontoauszug-20200101.pdf");
        fs::write(&input, b"%PDF-1.4\n").unwrap();

        // Occupy the Failed path with a file.
        fs::write(dir.path().join("Failed"), b"in the way").unwrap();

        let err = organizer(keyword_registry())
            .organize(vec![input.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, OrganizeError::DirectoryCreationFailed { .. }));
        assert!(input.exists());
    }

    struct PanickingHandler;

    impl DocumentHandler for PanickingHandler {
        fn name(&self) -> &str {
            "panicking"
        }

        fn is_handler_for(&self, _: &Document, _: &dyn DocumentInspector) -> bool {
            true
        }

        fn file_result(
            &self,
            _: &Document,
            _: &dyn DocumentInspector,
        ) -> Result<FilingResult, OrganizeError> {
            panic!("handler bug");
        }
    }

    #[tokio::test]
    async fn test_worker_panic_is_counted_not_propagated() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Bankname-2782161234-Kontoauszug-20200101.pdf");
        fs::write(&input, b"%PDF-1.4\n").unwrap();

        let handlers = HandlerRegistry::new(vec![Box::new(PanickingHandler)]);
        let report = organizer(handlers).organize(vec![input.clone()]).await.unwrap();

        assert_eq!(report.failed_count, 1);
        assert!(!report.success);
        assert!(input.exists());
    }

    #[tokio::test]
    async fn test_progress_callback_fires_per_document() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("Bankname-2782161234-Kontoauszug-20200101.pdf");
        let second = dir.path().join("Bankname-2782161234-Kontoauszug-20200201.pdf");
        fs::write(&first, b"%PDF-1.4\n").unwrap();
        fs::write(&second, b"%PDF-1.4\n").unwrap();

        let calls = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let callback: Arc<ProgressCallback> = Arc::new(Box::new(move |processed, total| {
            seen.lock().unwrap().push((processed, total));
        }));

        let report = organizer(keyword_registry())
            .organize_with_progress(vec![first, second], Some(callback))
            .await
            .unwrap();
        assert!(report.success);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|&(processed, total)| {
            processed >= 1 && processed <= 2 && total == 2
        }));
        assert!(calls.iter().any(|&(processed, _)| processed == 2));
    }
}
