use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::config::EmbeddingConfig;
use crate::error::{DlpError, Result};

use super::{normalize, Embedder, Embeddings};

/// Local ONNX embedder backed by fastembed.
///
/// The model is loaded on first use, so constructing the embedder never
/// downloads weights.
pub struct FastEmbedder {
    model_name: String,
    dim: usize,
    cache_dir: Option<PathBuf>,
    model: Mutex<Option<TextEmbedding>>,
}

impl FastEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        // fail early on an unknown model name
        resolve_model(&config.model)?;
        Ok(Self {
            model_name: config.model.clone(),
            dim: config.dim,
            cache_dir: config.cache_dir.clone(),
            model: Mutex::new(None),
        })
    }

    fn load(&self) -> Result<TextEmbedding> {
        let mut options =
            InitOptions::new(resolve_model(&self.model_name)?).with_show_download_progress(false);
        if let Some(dir) = &self.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }
        tracing::info!("loading embedding model {}", self.model_name);
        TextEmbedding::try_new(options).map_err(|e| DlpError::Embedding {
            reason: e.to_string(),
        })
    }
}

/// Map a configured model name onto a fastembed model.
pub fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    match name {
        "multilingual-e5-small" => Ok(EmbeddingModel::MultilingualE5Small),
        "multilingual-e5-base" => Ok(EmbeddingModel::MultilingualE5Base),
        "multilingual-e5-large" => Ok(EmbeddingModel::MultilingualE5Large),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        other => Err(DlpError::InvalidConfig {
            reason: format!("unknown embedding model: {other}"),
        }),
    }
}

impl Embedder for FastEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, texts: &[String]) -> Result<Embeddings> {
        let mut guard = self.model.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            *guard = Some(self.load()?);
        }
        let model = guard.as_mut().ok_or_else(|| DlpError::Embedding {
            reason: "embedding model not available".into(),
        })?;
        let mut vectors = model
            .embed(texts.to_vec(), None)
            .map_err(|e| DlpError::Embedding {
                reason: e.to_string(),
            })?;
        for v in vectors.iter_mut() {
            if v.len() != self.dim {
                return Err(DlpError::Embedding {
                    reason: format!(
                        "model {} produced dimension {}, configured {}",
                        self.model_name,
                        v.len(),
                        self.dim
                    ),
                });
            }
            normalize(v);
        }
        Ok(Embeddings {
            vectors,
            dim: self.dim,
        })
    }
}
