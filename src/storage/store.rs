use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{DlpError, Result};

use super::IndexCorpus;

/// Flat array of every vector, concatenated in document order.
pub const VECTOR_FILE: &str = "vector_index.json";
/// Ordered list of document paths.
pub const FILE_MAP_FILE: &str = "file_map.json";

/// The two aligned on-disk artifacts of an index directory.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    index_dir: PathBuf,
}

impl CorpusStore {
    pub fn new(index_dir: PathBuf) -> Self {
        Self { index_dir }
    }

    pub fn vector_path(&self) -> PathBuf {
        self.index_dir.join(VECTOR_FILE)
    }

    pub fn file_map_path(&self) -> PathBuf {
        self.index_dir.join(FILE_MAP_FILE)
    }

    /// True when a vector artifact exists.
    pub fn exists(&self) -> bool {
        self.vector_path().exists()
    }

    /// Write both artifacts. Each is staged to a temp file first and the two
    /// renames happen back to back, so a failed write leaves the old pair intact.
    pub fn save(&self, corpus: &IndexCorpus) -> Result<()> {
        fs::create_dir_all(&self.index_dir)?;
        let vectors = self.stage(&serde_json::to_vec_pretty(&corpus.flat())?)?;
        let file_map = self.stage(&serde_json::to_vec_pretty(corpus.paths())?)?;

        vectors
            .persist(self.vector_path())
            .map_err(|e| DlpError::Storage {
                reason: format!("failed to write {}: {}", self.vector_path().display(), e),
            })?;
        file_map
            .persist(self.file_map_path())
            .map_err(|e| DlpError::Storage {
                reason: format!("failed to write {}: {}", self.file_map_path().display(), e),
            })?;

        tracing::info!(
            "saved {} document(s) to {}",
            corpus.len(),
            self.index_dir.display()
        );
        Ok(())
    }

    fn stage(&self, data: &[u8]) -> Result<tempfile::NamedTempFile> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.index_dir).map_err(|e| {
            DlpError::Storage {
                reason: format!("failed to stage in {}: {}", self.index_dir.display(), e),
            }
        })?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }

    /// Load the persisted corpus. `None` when no vector artifact exists.
    pub fn load(&self, dim: usize) -> Result<Option<IndexCorpus>> {
        let vector_path = self.vector_path();
        if !vector_path.exists() {
            return Ok(None);
        }
        let map_path = self.file_map_path();
        if !map_path.exists() {
            return Err(DlpError::CorruptIndex {
                path: map_path,
                reason: "file map missing next to vector artifact".into(),
            });
        }

        let flat: Vec<f32> = read_json(&vector_path)?;
        let paths: Vec<String> = read_json(&map_path)?;
        IndexCorpus::from_flat(dim, flat, paths, &vector_path).map(Some)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path).map_err(|e| DlpError::Storage {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    serde_json::from_slice(&data).map_err(|e| DlpError::CorruptIndex {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
