use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{DlpError, Result};
use crate::extract::{preview, DocumentExtractor};
use crate::storage::lifecycle::path_key;
use crate::storage::walk::walk_files;

/// Characters of text shown per file.
const PREVIEW_CHARS: usize = 500;

/// Extract every file under a folder and print a short preview of each.
pub fn run(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(DlpError::InvalidInput {
            reason: format!("not a directory: {}", path.display()),
        });
    }

    let previews: BTreeMap<String, String> = walk_files(path)
        .map(|file| {
            let text = preview(&DocumentExtractor, &file, PREVIEW_CHARS);
            (path_key(&file), text)
        })
        .collect();

    eprintln!("dlp-guard: extracted {} file(s)", previews.len());
    println!("{}", serde_json::to_string_pretty(&previews)?);
    Ok(())
}
