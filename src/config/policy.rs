use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::decision::RiskThresholds;
use crate::error::{DlpError, Result};
use crate::search::SearchBackend;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DlpConfig {
    /// Where the corpus lives and which files feed it.
    #[serde(default)]
    pub index: IndexConfig,

    /// Embedding model settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Risk bands and neighbor search.
    #[serde(default)]
    pub similarity: SimilarityConfig,
}

impl DlpConfig {
    /// Load config from a YAML file. Returns default if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&contents).map_err(|e| DlpError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from the project root. Checks `.dlp-guard/config.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        Self::load_from(&super::project_config_path(project_root))
    }

    /// Reject settings no decision can be made with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.similarity;
        if s.danger_threshold > s.critical_threshold {
            return Err(DlpError::InvalidConfig {
                reason: format!(
                    "danger_threshold {} exceeds critical_threshold {}",
                    s.danger_threshold, s.critical_threshold
                ),
            });
        }
        if s.top_k == 0 {
            return Err(DlpError::InvalidConfig {
                reason: "top_k must be at least 1".into(),
            });
        }
        if self.embedding.dim == 0 {
            return Err(DlpError::InvalidConfig {
                reason: "embedding dim must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Corpus location and file selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the persisted artifacts.
    pub save_dir: PathBuf,

    /// Folder indexed when none is given.
    pub default_folder: PathBuf,

    /// File-name prefixes of lock/temp files skipped by incremental adds.
    pub transient_prefixes: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("./dictionary"),
            default_folder: PathBuf::from("./sanitized"),
            transient_prefixes: vec!["~$".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dim: usize,
    /// Upper bound on a query embedding call. Default: 30.
    pub timeout_secs: u64,
    /// Model weight cache; fastembed's default when unset.
    pub cache_dir: Option<PathBuf>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "multilingual-e5-base".into(),
            dim: 768,
            timeout_secs: 30,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub danger_threshold: f32,
    pub critical_threshold: f32,
    pub top_k: usize,
    pub backend: SearchBackend,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            danger_threshold: 0.80,
            critical_threshold: 0.85,
            top_k: 3,
            backend: SearchBackend::Flat,
        }
    }
}

impl SimilarityConfig {
    pub fn thresholds(&self) -> RiskThresholds {
        RiskThresholds {
            danger: self.danger_threshold,
            critical: self.critical_threshold,
        }
    }
}
