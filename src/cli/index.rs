use std::path::PathBuf;

use crate::config::DlpConfig;
use crate::error::Result;
use crate::service::{DlpService, IndexSummary};

use super::{print_success, FilesBody};

/// Build the index from scratch.
pub async fn run_init(config: &DlpConfig, path: Option<PathBuf>) -> Result<()> {
    let folder = path.unwrap_or_else(|| config.index.default_folder.clone());
    let service = DlpService::new(config)?;

    eprintln!("dlp-guard: embedding documents under {}...", folder.display());
    let summary = service.init_index(&folder).await?;
    print_success(embedded_body(summary))
}

/// Add new documents to the existing index.
pub async fn run_add(config: &DlpConfig, path: Option<PathBuf>) -> Result<()> {
    let folder = path.unwrap_or_else(|| config.index.default_folder.clone());
    let service = DlpService::new(config)?;

    eprintln!("dlp-guard: scanning {} for new documents...", folder.display());
    let summary = service.add_to_index(&folder).await?;
    eprintln!("dlp-guard: {} new document(s)", summary.added);
    print_success(embedded_body(summary))
}

/// Load and verify the persisted index.
pub async fn run_load(config: &DlpConfig) -> Result<()> {
    let service = DlpService::new(config)?;
    match service.load_index().await? {
        Some(summary) => print_success(FilesBody {
            message: format!("{} document(s) loaded", summary.files.len()),
            files: summary.files,
        }),
        None => print_success(FilesBody {
            files: Vec::new(),
            message: format!("no index found in {}", config.index.save_dir.display()),
        }),
    }
}

fn embedded_body(summary: IndexSummary) -> FilesBody {
    FilesBody {
        message: format!("{} documents embedded", summary.files.len()),
        files: summary.files,
    }
}
