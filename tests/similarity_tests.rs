//! Similarity decisions over a hand-built corpus.

mod common;

use common::{at_cosine, axis, DIM};
use dlp_guard::decision::{Action, RiskBand, RiskThresholds};
use dlp_guard::search::SearchBackend;
use dlp_guard::similarity::{LoadedIndex, SimilarityEngine};
use dlp_guard::storage::IndexCorpus;

fn loaded(vectors: Vec<Vec<f32>>, backend: SearchBackend) -> LoadedIndex {
    let paths = (0..vectors.len()).map(|i| format!("doc{i}.txt")).collect();
    let mut corpus = IndexCorpus::new(DIM);
    corpus.extend(vectors, paths).unwrap();
    LoadedIndex::build(corpus, backend)
}

fn decide(vectors: Vec<Vec<f32>>) -> dlp_guard::decision::DecisionResult {
    SimilarityEngine::default().decide(&axis(0), &loaded(vectors, SearchBackend::Flat))
}

#[test]
fn near_duplicate_blocks() {
    let result = decide(vec![at_cosine(0.9), axis(3)]);
    assert_eq!(result.action, Action::Block);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].file, "doc0.txt");
    assert_eq!(result.matches[0].band, RiskBand::Critical);
    assert!((result.matches[0].score - 0.9).abs() < 1e-6);
}

#[test]
fn danger_band_holds_for_review() {
    let result = decide(vec![at_cosine(0.82)]);
    assert_eq!(result.action, Action::HoldForReview);
    assert_eq!(result.matches[0].band, RiskBand::Danger);
}

#[test]
fn exact_danger_threshold_holds() {
    // 0.8 * 1.0 is exact in f32, so this lands on the boundary itself
    let mut v = vec![0.0; DIM];
    v[0] = 0.8;
    v[1] = 0.6;
    let result = decide(vec![v]);
    assert_eq!(result.action, Action::HoldForReview);
    assert_eq!(result.matches.len(), 1);
}

#[test]
fn unrelated_corpus_allows_with_no_matches() {
    let result = decide(vec![axis(1), axis(2), at_cosine(0.5)]);
    assert_eq!(result.action, Action::Allow);
    assert!(result.matches.is_empty());
}

#[test]
fn empty_corpus_allows() {
    let result = decide(vec![]);
    assert_eq!(result.action, Action::Allow);
    assert!(result.matches.is_empty());
}

#[test]
fn action_follows_best_neighbor() {
    let result = decide(vec![at_cosine(0.81), at_cosine(0.95), at_cosine(0.3)]);
    assert_eq!(result.action, Action::Block);

    let bands: Vec<(String, RiskBand)> = result
        .matches
        .iter()
        .map(|m| (m.file.clone(), m.band))
        .collect();
    assert_eq!(
        bands,
        vec![
            ("doc1.txt".to_string(), RiskBand::Critical),
            ("doc0.txt".to_string(), RiskBand::Danger),
        ]
    );
}

#[test]
fn only_top_three_are_considered() {
    let vectors = vec![
        at_cosine(0.99),
        at_cosine(0.98),
        at_cosine(0.97),
        at_cosine(0.96),
        at_cosine(0.95),
    ];
    let result = decide(vectors);
    assert_eq!(result.matches.len(), 3);
    assert_eq!(result.matches[0].file, "doc0.txt");
    assert_eq!(result.matches[2].file, "doc2.txt");
}

#[test]
fn custom_thresholds_and_k() {
    let engine = SimilarityEngine::new(
        RiskThresholds {
            danger: 0.5,
            critical: 0.7,
        },
        1,
    );
    let index = loaded(vec![at_cosine(0.6), at_cosine(0.55)], SearchBackend::Flat);
    let result = engine.decide(&axis(0), &index);
    assert_eq!(result.action, Action::HoldForReview);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].file, "doc0.txt");
}

#[test]
fn hnsw_backend_matches_flat_on_small_corpus() {
    let vectors = vec![axis(1), at_cosine(0.9), axis(2), at_cosine(0.83)];
    let engine = SimilarityEngine::default();
    let flat = engine.decide(&axis(0), &loaded(vectors.clone(), SearchBackend::Flat));
    let hnsw = engine.decide(&axis(0), &loaded(vectors, SearchBackend::Hnsw));

    assert_eq!(flat.action, hnsw.action);
    let files = |r: &dlp_guard::decision::DecisionResult| {
        r.matches.iter().map(|m| m.file.clone()).collect::<Vec<_>>()
    };
    assert_eq!(files(&flat), files(&hnsw));
}
