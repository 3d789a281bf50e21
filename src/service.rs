use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::config::DlpConfig;
use crate::decision::DecisionResult;
use crate::detect::{AnalysisResult, PatternEngine};
use crate::embed::fast::FastEmbedder;
use crate::embed::{check_batch, Embedder};
use crate::error::{DlpError, Result};
use crate::extract::{DocumentExtractor, TextExtractor};
use crate::search::SearchBackend;
use crate::similarity::{LoadedIndex, SimilarityEngine};
use crate::storage::lifecycle::IndexLifecycle;
use crate::storage::store::CorpusStore;
use crate::storage::IndexCorpus;

/// Outcome of an index operation, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    /// Every path in the corpus after the operation.
    pub files: Vec<String>,
    /// How many of them this operation embedded.
    pub added: usize,
}

/// The DLP decision service.
///
/// Pattern analysis is stateless. The similarity path reads an immutable
/// snapshot of the active index; init/add/load build a complete replacement
/// under a single writer lock and swap it in.
pub struct DlpService {
    engine: PatternEngine,
    lifecycle: Arc<IndexLifecycle>,
    embedder: Arc<dyn Embedder>,
    similarity: SimilarityEngine,
    backend: SearchBackend,
    embed_timeout: Duration,
    active: RwLock<Option<Arc<LoadedIndex>>>,
    writer: tokio::sync::Mutex<()>,
}

impl DlpService {
    /// Service with the fastembed model and the document extractor.
    pub fn new(config: &DlpConfig) -> Result<Self> {
        let embedder = Arc::new(FastEmbedder::new(&config.embedding)?);
        Self::with_collaborators(config, embedder, Arc::new(DocumentExtractor))
    }

    /// Service with injected embedding and extraction collaborators.
    pub fn with_collaborators(
        config: &DlpConfig,
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Result<Self> {
        config.validate()?;
        let lifecycle = IndexLifecycle::new(
            CorpusStore::new(config.index.save_dir.clone()),
            extractor,
            Arc::clone(&embedder),
            config.index.transient_prefixes.clone(),
        );
        Ok(Self {
            engine: PatternEngine::default_engine()?,
            lifecycle: Arc::new(lifecycle),
            embedder,
            similarity: SimilarityEngine::new(
                config.similarity.thresholds(),
                config.similarity.top_k,
            ),
            backend: config.similarity.backend,
            embed_timeout: Duration::from_secs(config.embedding.timeout_secs),
            active: RwLock::new(None),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    /// Rebuild the index from every file under `folder`.
    pub async fn init_index(&self, folder: &Path) -> Result<IndexSummary> {
        let _guard = self.writer.lock().await;
        let folder = folder.to_path_buf();
        let corpus = self
            .blocking(move |lifecycle| lifecycle.init(&folder))
            .await?;
        let summary = IndexSummary {
            files: corpus.paths().to_vec(),
            added: corpus.len(),
        };
        self.activate(Some(corpus));
        Ok(summary)
    }

    /// Embed files under `folder` that are not indexed yet.
    pub async fn add_to_index(&self, folder: &Path) -> Result<IndexSummary> {
        let _guard = self.writer.lock().await;
        let folder = folder.to_path_buf();
        let update = self
            .blocking(move |lifecycle| lifecycle.add(&folder))
            .await?;
        match update {
            Some(update) => {
                let summary = IndexSummary {
                    files: update.corpus.paths().to_vec(),
                    added: update.added.len(),
                };
                self.activate(Some(update.corpus));
                Ok(summary)
            }
            None => Ok(IndexSummary {
                files: Vec::new(),
                added: 0,
            }),
        }
    }

    /// Reload the persisted index. `None` when nothing has been persisted.
    pub async fn load_index(&self) -> Result<Option<IndexSummary>> {
        let _guard = self.writer.lock().await;
        let corpus = self.blocking(|lifecycle| lifecycle.load()).await?;
        let summary = corpus.as_ref().map(|c| IndexSummary {
            files: c.paths().to_vec(),
            added: 0,
        });
        if corpus.is_some() {
            self.activate(corpus);
        }
        Ok(summary)
    }

    /// Structured PII detection and masking.
    pub fn analyze_structured(&self, text: &str) -> Result<AnalysisResult> {
        self.engine.analyze(text)
    }

    /// Similarity decision for `text` against the active index, loading the
    /// persisted index first if none is active.
    pub async fn decide_similarity(&self, text: &str) -> Result<DecisionResult> {
        if text.is_empty() {
            return Err(DlpError::InvalidInput {
                reason: "text must be a non-empty string".into(),
            });
        }
        let index = match self.snapshot() {
            Some(index) => index,
            None => self.load_for_search().await?,
        };
        let query = self.embed_query(text).await?;
        Ok(self.similarity.decide(&query, &index))
    }

    /// True when an index is active in memory.
    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    fn snapshot(&self) -> Option<Arc<LoadedIndex>> {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn activate(&self, corpus: Option<IndexCorpus>) {
        let loaded = corpus.map(|c| Arc::new(LoadedIndex::build(c, self.backend)));
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = loaded;
    }

    async fn load_for_search(&self) -> Result<Arc<LoadedIndex>> {
        let _guard = self.writer.lock().await;
        // another caller may have loaded while we waited
        if let Some(index) = self.snapshot() {
            return Ok(index);
        }
        let corpus = self.blocking(|lifecycle| lifecycle.load()).await?;
        if corpus.is_none() {
            return Err(DlpError::UninitializedIndex);
        }
        self.activate(corpus);
        self.snapshot().ok_or(DlpError::UninitializedIndex)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let texts = vec![text.to_string()];
        let task = tokio::task::spawn_blocking(move || {
            let dim = embedder.dim();
            embedder
                .embed(&texts)
                .and_then(|e| check_batch(e, 1, dim))
        });
        let mut vectors = tokio::time::timeout(self.embed_timeout, task)
            .await
            .map_err(|_| DlpError::CollaboratorTimeout {
                timeout_secs: self.embed_timeout.as_secs(),
            })?
            .map_err(|e| DlpError::Task {
                reason: e.to_string(),
            })??;
        vectors.pop().ok_or_else(|| DlpError::Embedding {
            reason: "no embedding returned".into(),
        })
    }

    /// Run lifecycle work off the async runtime.
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&IndexLifecycle) -> Result<T> + Send + 'static,
    {
        let lifecycle = Arc::clone(&self.lifecycle);
        tokio::task::spawn_blocking(move || f(&lifecycle))
            .await
            .map_err(|e| DlpError::Task {
                reason: e.to_string(),
            })?
    }
}
