pub mod lifecycle;
pub mod store;
pub mod walk;

use std::path::Path;

use crate::error::{DlpError, Result};

/// Aligned (vector, path) pairs: `vectors[i]` is the embedding of `paths[i]`.
///
/// Fields are private so the two sequences can only grow together.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexCorpus {
    dim: usize,
    vectors: Vec<Vec<f32>>,
    paths: Vec<String>,
}

impl IndexCorpus {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// Rebuild from persisted form: all vectors concatenated in document order.
    ///
    /// `origin` names the artifact in errors.
    pub fn from_flat(dim: usize, flat: Vec<f32>, paths: Vec<String>, origin: &Path) -> Result<Self> {
        if dim == 0 {
            return Err(DlpError::CorruptIndex {
                path: origin.to_path_buf(),
                reason: "dimension must be positive".into(),
            });
        }
        if flat.len() != dim * paths.len() {
            return Err(DlpError::CorruptIndex {
                path: origin.to_path_buf(),
                reason: format!(
                    "{} floats cannot hold {} vector(s) of dimension {}",
                    flat.len(),
                    paths.len(),
                    dim
                ),
            });
        }
        let vectors = flat.chunks_exact(dim).map(<[f32]>::to_vec).collect();
        Ok(Self {
            dim,
            vectors,
            paths,
        })
    }

    /// Append documents, keeping both sequences aligned.
    pub fn extend(&mut self, vectors: Vec<Vec<f32>>, paths: Vec<String>) -> Result<()> {
        if vectors.len() != paths.len() {
            return Err(DlpError::Storage {
                reason: format!(
                    "cannot append {} vector(s) for {} path(s)",
                    vectors.len(),
                    paths.len()
                ),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dim) {
            return Err(DlpError::Embedding {
                reason: format!("expected dimension {}, got {}", self.dim, bad.len()),
            });
        }
        self.vectors.extend(vectors);
        self.paths.extend(paths);
        Ok(())
    }

    /// All vectors concatenated in document order.
    pub fn flat(&self) -> Vec<f32> {
        self.vectors.iter().flatten().copied().collect()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn path(&self, label: usize) -> Option<&str> {
        self.paths.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
