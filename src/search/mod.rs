pub mod flat;
pub mod hnsw;

use serde::{Deserialize, Serialize};

pub use flat::FlatInnerProduct;
pub use hnsw::HnswInnerProduct;

/// One search hit: inner-product similarity and the corpus position it refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub similarity: f32,
    pub label: usize,
}

/// Nearest-neighbor search over unit vectors, scored by inner product.
pub trait VectorIndex: Send + Sync {
    /// Append vectors; labels continue from the current count.
    fn add(&mut self, vectors: &[Vec<f32>]);

    /// Up to `k` neighbors, most similar first.
    fn search(&self, query: &[f32], k: usize) -> Vec<Neighbor>;

    /// Number of indexed vectors.
    fn count(&self) -> usize;
}

/// Which search structure to build for a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// Exact scan.
    #[default]
    Flat,
    /// Approximate HNSW graph.
    Hnsw,
}

impl SearchBackend {
    pub fn create(&self, dim: usize) -> Box<dyn VectorIndex> {
        match self {
            SearchBackend::Flat => Box::new(FlatInnerProduct::new(dim)),
            SearchBackend::Hnsw => Box::new(HnswInnerProduct::new(dim)),
        }
    }
}

/// Inner product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
