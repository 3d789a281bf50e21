use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DlpError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("no valid documents found under {folder}")]
    EmptyCorpus { folder: PathBuf },

    #[error("index not initialized yet")]
    UninitializedIndex,

    #[error("extraction failed for {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("corrupt index at {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    #[error("embedding error: {reason}")]
    Embedding { reason: String },

    #[error("collaborator timeout after {timeout_secs}s")]
    CollaboratorTimeout { timeout_secs: u64 },

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("background task failed: {reason}")]
    Task { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DlpError>;
