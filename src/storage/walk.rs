use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Regular files under `root`, depth-first, entries sorted by name.
///
/// The iterator is lazy; call again to restart. Unreadable entries are
/// logged and skipped.
pub fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("error accessing {}: {}", display_err_path(&e), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
}

fn display_err_path(e: &walkdir::Error) -> String {
    e.path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".into())
}

/// True when the file name starts with any of `prefixes` (editor lock files).
pub fn is_transient(path: &Path, prefixes: &[String]) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .is_some_and(|name| prefixes.iter().any(|p| name.starts_with(p.as_str())))
}
