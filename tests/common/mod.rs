//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use dlp_guard::embed::{normalize, Embedder, Embeddings};
use dlp_guard::DlpError;

pub const DIM: usize = 8;

/// Deterministic embedder: pinned vectors for known texts, a byte-hash
/// vector otherwise. Records every text it embeds.
pub struct FakeEmbedder {
    pinned: HashMap<String, Vec<f32>>,
    fail_on: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeEmbedder {
    pub fn new() -> Self {
        Self {
            pinned: HashMap::new(),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Embed `text` as `vector` (normalized).
    pub fn pin(mut self, text: &str, mut vector: Vec<f32>) -> Self {
        vector.resize(DIM, 0.0);
        normalize(&mut vector);
        self.pinned.insert(text.to_string(), vector);
        self
    }

    /// Fail any call that includes a text containing `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    pub fn embedded(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(v) = self.pinned.get(text) {
            return v.clone();
        }
        let mut v = vec![0.0f32; DIM];
        for (i, b) in text.bytes().enumerate() {
            v[(b as usize + i) % DIM] += 1.0;
        }
        normalize(&mut v);
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        DIM
    }

    fn embed(&self, texts: &[String]) -> dlp_guard::Result<Embeddings> {
        if let Some(needle) = &self.fail_on {
            if texts.iter().any(|t| t.contains(needle.as_str())) {
                return Err(DlpError::Embedding {
                    reason: format!("refusing {needle}"),
                });
            }
        }
        self.calls.lock().unwrap().extend(texts.iter().cloned());
        Ok(Embeddings {
            vectors: texts.iter().map(|t| self.vector_for(t)).collect(),
            dim: DIM,
        })
    }
}

/// Unit vector along one axis.
pub fn axis(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[i] = 1.0;
    v
}

/// Unit vector with cosine `cos` to `axis(0)`, lying in the plane of axes 0 and 1.
pub fn at_cosine(cos: f32) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[0] = cos;
    v[1] = (1.0 - cos * cos).sqrt();
    v
}
