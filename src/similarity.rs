use crate::decision::{DecisionResult, NeighborMatch, RiskBand, RiskThresholds};
use crate::search::{SearchBackend, VectorIndex};
use crate::storage::IndexCorpus;

/// A corpus paired with the search structure built over it.
///
/// Built whole and then shared read-only, so a reader never sees vectors and
/// paths out of step.
pub struct LoadedIndex {
    corpus: IndexCorpus,
    search: Box<dyn VectorIndex>,
}

impl LoadedIndex {
    pub fn build(corpus: IndexCorpus, backend: SearchBackend) -> Self {
        let mut search = backend.create(corpus.dim());
        search.add(corpus.vectors());
        Self { corpus, search }
    }

    pub fn count(&self) -> usize {
        self.search.count()
    }
}

/// Turns nearest-neighbor similarities into an enforcement action.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine {
    thresholds: RiskThresholds,
    top_k: usize,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new(RiskThresholds::default(), 3)
    }
}

impl SimilarityEngine {
    pub fn new(thresholds: RiskThresholds, top_k: usize) -> Self {
        Self { thresholds, top_k }
    }

    /// Decide on an already-embedded query.
    ///
    /// The action follows the best of all `k` neighbors; the report keeps only
    /// neighbors in the danger or critical band.
    pub fn decide(&self, query: &[f32], index: &LoadedIndex) -> DecisionResult {
        let k = self.top_k.min(index.count());
        let neighbors = index.search.search(query, k);

        let max_similarity = neighbors
            .iter()
            .map(|n| n.similarity)
            .reduce(f32::max);
        let action = self.thresholds.action_for(max_similarity);

        let matches = neighbors
            .iter()
            .filter_map(|n| {
                let band = self.thresholds.classify(n.similarity);
                if band == RiskBand::Safe {
                    return None;
                }
                let file = index.corpus.path(n.label)?;
                Some(NeighborMatch {
                    file: file.to_string(),
                    band,
                    score: n.similarity,
                })
            })
            .collect();

        tracing::debug!(
            "similarity decision {} over {} neighbor(s), max {:?}",
            action,
            neighbors.len(),
            max_similarity
        );
        DecisionResult { action, matches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Action;

    fn index(vectors: Vec<Vec<f32>>) -> LoadedIndex {
        let paths = (0..vectors.len()).map(|i| format!("doc{i}.txt")).collect();
        let mut corpus = IndexCorpus::new(2);
        corpus.extend(vectors, paths).unwrap();
        LoadedIndex::build(corpus, SearchBackend::Flat)
    }

    #[test]
    fn test_empty_corpus_allows() {
        let result = SimilarityEngine::default().decide(&[1.0, 0.0], &index(vec![]));
        assert_eq!(result.action, Action::Allow);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_hnsw_backend_agrees() {
        let mut corpus = IndexCorpus::new(2);
        corpus
            .extend(vec![vec![0.0, 1.0], vec![1.0, 0.0]], vec!["a".into(), "b".into()])
            .unwrap();
        let loaded = LoadedIndex::build(corpus, SearchBackend::Hnsw);
        let result = SimilarityEngine::default().decide(&[1.0, 0.0], &loaded);
        assert_eq!(result.action, Action::Block);
        assert_eq!(result.matches[0].file, "b");
    }
}
