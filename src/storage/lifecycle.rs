use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::embed::{embed_each, Embedder};
use crate::error::{DlpError, Result};
use crate::extract::TextExtractor;

use super::store::CorpusStore;
use super::walk::{is_transient, walk_files};
use super::IndexCorpus;

/// Result of an incremental add.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexUpdate {
    /// The corpus after the add (unchanged when nothing was new).
    pub corpus: IndexCorpus,
    /// Paths appended by this call, in walk order.
    pub added: Vec<String>,
}

/// Builds, extends and reloads the persisted corpus.
///
/// Holds no corpus of its own: the artifacts on disk are the source of truth
/// for every operation.
pub struct IndexLifecycle {
    store: CorpusStore,
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn Embedder>,
    transient_prefixes: Vec<String>,
}

impl IndexLifecycle {
    pub fn new(
        store: CorpusStore,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn Embedder>,
        transient_prefixes: Vec<String>,
    ) -> Self {
        Self {
            store,
            extractor,
            embedder,
            transient_prefixes,
        }
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    /// Full rebuild from every file under `folder`. Replaces the persisted corpus.
    pub fn init(&self, folder: &Path) -> Result<IndexCorpus> {
        check_folder(folder)?;
        let docs = self.read_documents(walk_files(folder));
        if docs.is_empty() {
            return Err(DlpError::EmptyCorpus {
                folder: folder.to_path_buf(),
            });
        }

        let mut corpus = IndexCorpus::new(self.embedder.dim());
        let (vectors, paths) = self.embed_documents(docs);
        if paths.is_empty() {
            return Err(DlpError::EmptyCorpus {
                folder: folder.to_path_buf(),
            });
        }
        corpus.extend(vectors, paths)?;
        self.store.save(&corpus)?;

        tracing::info!(
            "embedded {} document(s) from {}",
            corpus.len(),
            folder.display()
        );
        Ok(corpus)
    }

    /// Append files under `folder` that the persisted corpus does not know yet.
    ///
    /// Lock artifacts and known paths are skipped without being read. Returns
    /// `None` only when there is neither a persisted corpus nor anything new.
    pub fn add(&self, folder: &Path) -> Result<Option<IndexUpdate>> {
        check_folder(folder)?;
        let existing = self.store.load(self.embedder.dim())?;
        let known: HashSet<String> = existing
            .as_ref()
            .map(|c| c.paths().iter().map(|p| path_key(Path::new(p))).collect())
            .unwrap_or_default();

        let candidates = walk_files(folder)
            .filter(|p| !is_transient(p, &self.transient_prefixes))
            .filter(|p| !known.contains(&path_key(p)));
        let docs = self.read_documents(candidates);
        let (vectors, paths) = self.embed_documents(docs);

        if paths.is_empty() {
            tracing::info!("no new documents under {}", folder.display());
            return Ok(existing.map(|corpus| IndexUpdate {
                corpus,
                added: Vec::new(),
            }));
        }

        let mut corpus = existing.unwrap_or_else(|| IndexCorpus::new(self.embedder.dim()));
        corpus.extend(vectors, paths.clone())?;
        self.store.save(&corpus)?;

        tracing::info!(
            "added {} document(s), corpus now holds {}",
            paths.len(),
            corpus.len()
        );
        Ok(Some(IndexUpdate {
            corpus,
            added: paths,
        }))
    }

    /// Load the persisted corpus, if any.
    pub fn load(&self) -> Result<Option<IndexCorpus>> {
        self.store.load(self.embedder.dim())
    }

    /// Extract each file, dropping failures and whitespace-only text.
    fn read_documents(&self, files: impl Iterator<Item = PathBuf>) -> Vec<(String, String)> {
        files
            .filter_map(|path| match self.extractor.extract(&path) {
                Ok(text) if !text.trim().is_empty() => Some((path_key(&path), text)),
                Ok(_) => {
                    tracing::debug!("no text in {}", path.display());
                    None
                }
                Err(e) => {
                    tracing::warn!("error reading {}: {}", path.display(), e);
                    None
                }
            })
            .collect()
    }

    /// Embed documents in one batch; documents that fail to embed are dropped.
    fn embed_documents(&self, docs: Vec<(String, String)>) -> (Vec<Vec<f32>>, Vec<String>) {
        let (paths, texts): (Vec<String>, Vec<String>) = docs.into_iter().unzip();
        let mut kept_vectors = Vec::with_capacity(paths.len());
        let mut kept_paths = Vec::with_capacity(paths.len());
        for (path, vector) in paths.into_iter().zip(embed_each(self.embedder.as_ref(), &texts)) {
            match vector {
                Some(v) => {
                    kept_vectors.push(v);
                    kept_paths.push(path);
                }
                None => tracing::warn!("skipping {}: embedding failed", path),
            }
        }
        (kept_vectors, kept_paths)
    }
}

/// The identifier a file is stored under in the file map.
///
/// Normalized lexically, so `./docs/a.txt`, `docs/a.txt` and `docs/x/../a.txt`
/// share one key. Symlinks are not resolved.
pub fn path_key(path: &Path) -> String {
    let mut key = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = key.components().next_back();
                let after_name = matches!(last, Some(Component::Normal(_)));
                // `..` at the root stays at the root
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if after_name {
                    key.pop();
                } else if !at_root {
                    key.push(component);
                }
            }
            other => key.push(other),
        }
    }
    key.to_string_lossy().into_owned()
}

fn check_folder(folder: &Path) -> Result<()> {
    if folder.is_dir() {
        Ok(())
    } else {
        Err(DlpError::InvalidInput {
            reason: format!("not a directory: {}", folder.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_key_ignores_current_dir() {
        let plain = path_key(Path::new("sanitized/a.txt"));
        assert_eq!(plain, path_key(Path::new("./sanitized/a.txt")));
        assert_eq!(plain, path_key(&Path::new("sanitized/").join("a.txt")));
        assert_eq!(plain, path_key(Path::new("sanitized/./a.txt")));
    }

    #[test]
    fn test_path_key_folds_parent_dirs() {
        assert_eq!(path_key(Path::new("docs/x/../a.txt")), path_key(Path::new("docs/a.txt")));
        assert_eq!(path_key(Path::new("../docs/a.txt")), path_key(Path::new("../docs/a.txt")));
        assert_eq!(path_key(Path::new("/../a.txt")), path_key(Path::new("/a.txt")));
    }
}
