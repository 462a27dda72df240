//! Batch CLI entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pdf_filer::{
    Config, DirectoryManager, MatchPolicy, NullInspector, Organizer, PdfTextInspector,
};

#[derive(Debug, Parser)]
#[command(
    name = "pdf-filer",
    version,
    about = "Classify PDF documents and file them into a normalized archive tree"
)]
struct Cli {
    /// PDF files and/or directories to organize.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Accounts/handlers configuration file (JSON).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Match an account when any keyword appears (default: all keywords).
    #[arg(long)]
    match_any: bool,

    /// Recurse into input directories.
    #[arg(long)]
    recursive: bool,

    /// Classify and print destinations without touching the filesystem.
    #[arg(long)]
    dry_run: bool,

    /// Skip text extraction; classify by filename and metadata only.
    #[arg(long)]
    no_text: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let policy = cli.match_any.then_some(MatchPolicy::AnyKeyword);
    let handlers = config.handler_registry(policy)?;
    if handlers.is_empty() {
        bail!("no accounts or handlers configured; pass --config <FILE>");
    }

    let documents = collect_inputs(&cli.inputs, cli.recursive)?;
    if documents.is_empty() {
        bail!("no PDF documents found in the given inputs");
    }

    let inspector: Arc<dyn pdf_filer::DocumentInspector> = if cli.no_text {
        Arc::new(NullInspector)
    } else {
        Arc::new(PdfTextInspector::new())
    };
    let organizer = Organizer::new(handlers, inspector, Arc::new(DirectoryManager::new()));

    if cli.dry_run {
        for path in &documents {
            match organizer.classify(path) {
                Ok(filing) => println!(
                    "{} -> {}/{}/{}",
                    path.display(),
                    filing.branch.dir_name(),
                    filing.directory_segments.join("/"),
                    filing.file_name
                ),
                Err(err) => println!("{} -> Failed ({err})", path.display()),
            }
        }
        return Ok(());
    }

    let report = organizer.organize(documents).await?;
    println!(
        "filed {}/{} documents, {} failed",
        report.filed_count, report.total, report.failed_count
    );
    for error in &report.errors {
        println!("  {error}");
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,pdf_filer=info",
        1 => "info,pdf_filer=debug",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Expand the input list: files pass through, directories are scanned for
/// `*.pdf` entries (recursively with `--recursive`).
fn collect_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for input in inputs {
        if input.is_dir() {
            if recursive {
                for entry in walkdir::WalkDir::new(input)
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                {
                    if entry.file_type().is_file() && is_pdf(entry.path()) {
                        documents.push(entry.into_path());
                    }
                }
            } else {
                let entries = std::fs::read_dir(input)
                    .with_context(|| format!("failed to read directory {}", input.display()))?;
                for entry in entries {
                    let path = entry?.path();
                    if path.is_file() && is_pdf(&path) {
                        documents.push(path);
                    }
                }
            }
        } else {
            documents.push(input.clone());
        }
    }

    documents.sort();
    Ok(documents)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
