use super::{dot, Neighbor, VectorIndex};

/// A point in the embedding space (wrapper for instant-distance).
#[derive(Clone)]
pub struct Point(pub Vec<f32>);

impl instant_distance::Point for Point {
    fn distance(&self, other: &Self) -> f32 {
        // Inputs are unit vectors, so 1 - dot is cosine distance.
        // Clamped because rounding can push dot slightly past 1.
        (1.0 - dot(&self.0, &other.0)).max(0.0)
    }
}

/// Approximate inner-product search on an instant-distance HNSW graph.
///
/// instant-distance graphs are immutable, so `add` rebuilds from all points.
pub struct HnswInnerProduct {
    dim: usize,
    points: Vec<Point>,
    hnsw: Option<instant_distance::HnswMap<Point, usize>>,
}

impl HnswInnerProduct {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            points: Vec::new(),
            hnsw: None,
        }
    }

    fn rebuild(&mut self) {
        if self.points.is_empty() {
            self.hnsw = None;
            return;
        }
        let values: Vec<usize> = (0..self.points.len()).collect();
        self.hnsw = Some(instant_distance::Builder::default().build(self.points.clone(), values));
    }
}

impl VectorIndex for HnswInnerProduct {
    fn add(&mut self, vectors: &[Vec<f32>]) {
        if vectors.is_empty() {
            return;
        }
        for v in vectors {
            debug_assert_eq!(v.len(), self.dim);
            self.points.push(Point(v.clone()));
        }
        self.rebuild();
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        let Some(hnsw) = self.hnsw.as_ref() else {
            return Vec::new();
        };
        let query_point = Point(query.to_vec());
        let mut search_buf = instant_distance::Search::default();
        hnsw.search(&query_point, &mut search_buf)
            .take(k)
            .map(|item| {
                let label = *item.value;
                Neighbor {
                    // report the exact score, not the graph's clamped distance
                    similarity: dot(query, &self.points[label].0),
                    label,
                }
            })
            .collect()
    }

    fn count(&self) -> usize {
        self.points.len()
    }
}
