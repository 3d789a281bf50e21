pub mod fast;

use crate::error::{DlpError, Result};

/// Vectors returned by an embedding call.
#[derive(Debug, Clone, PartialEq)]
pub struct Embeddings {
    pub vectors: Vec<Vec<f32>>,
    pub dim: usize,
}

/// Text embedding collaborator. Vectors must be L2-normalized.
pub trait Embedder: Send + Sync {
    /// Output dimension, constant for a deployment.
    fn dim(&self) -> usize;

    /// Embed a batch of texts, one vector per text, in input order.
    fn embed(&self, texts: &[String]) -> Result<Embeddings>;
}

/// Scale a vector to unit L2 norm. Zero vectors are left unchanged.
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Embed a batch, falling back to one text at a time if the batch call fails.
///
/// Returns one slot per input; `None` marks a text that could not be embedded.
pub fn embed_each(embedder: &dyn Embedder, texts: &[String]) -> Vec<Option<Vec<f32>>> {
    if texts.is_empty() {
        return Vec::new();
    }
    match embedder.embed(texts).and_then(|e| check_batch(e, texts.len(), embedder.dim())) {
        Ok(vectors) => vectors.into_iter().map(Some).collect(),
        Err(e) => {
            tracing::warn!("batch embedding failed ({}), retrying per document", e);
            texts
                .iter()
                .map(|text| {
                    let single = std::slice::from_ref(text);
                    match embedder
                        .embed(single)
                        .and_then(|e| check_batch(e, 1, embedder.dim()))
                    {
                        Ok(mut v) => v.pop(),
                        Err(e) => {
                            tracing::warn!("embedding failed for one document: {}", e);
                            None
                        }
                    }
                })
                .collect()
        }
    }
}

/// Validate count and dimension of an embedding response.
pub fn check_batch(embeddings: Embeddings, expected: usize, dim: usize) -> Result<Vec<Vec<f32>>> {
    if embeddings.dim != dim {
        return Err(DlpError::Embedding {
            reason: format!("embedder reports dimension {}, expected {}", embeddings.dim, dim),
        });
    }
    if embeddings.vectors.len() != expected {
        return Err(DlpError::Embedding {
            reason: format!(
                "expected {} vectors, got {}",
                expected,
                embeddings.vectors.len()
            ),
        });
    }
    if let Some(bad) = embeddings.vectors.iter().find(|v| v.len() != dim) {
        return Err(DlpError::Embedding {
            reason: format!("expected dimension {}, got {}", dim, bad.len()),
        });
    }
    Ok(embeddings.vectors)
}
