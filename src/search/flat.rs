use super::{dot, Neighbor, VectorIndex};

/// Exact inner-product search over a flat vector store.
#[derive(Debug, Clone)]
pub struct FlatInnerProduct {
    dim: usize,
    data: Vec<f32>,
}

impl FlatInnerProduct {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }
}

impl VectorIndex for FlatInnerProduct {
    fn add(&mut self, vectors: &[Vec<f32>]) {
        for v in vectors {
            debug_assert_eq!(v.len(), self.dim);
            self.data.extend_from_slice(v);
        }
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        if self.dim == 0 || k == 0 {
            return Vec::new();
        }
        let mut scored: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(label, row)| Neighbor {
                similarity: dot(query, row),
                label,
            })
            .collect();
        // ties keep insertion order
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(k);
        scored
    }

    fn count(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_orders_by_similarity() {
        let mut index = FlatInnerProduct::new(2);
        index.add(&[vec![0.0, 1.0], vec![1.0, 0.0], vec![0.6, 0.8]]);
        assert_eq!(index.count(), 3);

        let hits = index.search(&[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].label, 1);
        assert!((hits[0].similarity - 1.0).abs() < 1e-6);
        assert_eq!(hits[1].label, 2);
    }

    #[test]
    fn test_k_larger_than_count() {
        let mut index = FlatInnerProduct::new(2);
        index.add(&[vec![1.0, 0.0]]);
        assert_eq!(index.search(&[1.0, 0.0], 3).len(), 1);
    }

    #[test]
    fn test_empty_index() {
        let index = FlatInnerProduct::new(4);
        assert_eq!(index.count(), 0);
        assert!(index.search(&[1.0, 0.0, 0.0, 0.0], 3).is_empty());
    }
}
