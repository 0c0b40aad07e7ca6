//! Error types for the medrag retrieval core
//!
//! Configuration-level errors abort initialization; per-query errors are
//! returned as typed failures. Remote synthesis failures are internal only
//! and always recovered by the local fallback path.

use thiserror::Error;

/// Main error type for the retrieval core
#[derive(Error, Debug)]
pub enum RagError {
    /// Blank or whitespace-only question
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// Requested result count below the minimum of 1
    #[error("top_k must be at least 1, got {0}")]
    InvalidTopK(usize),

    /// No built or loaded index is available to the engine
    #[error("Engine is not ready: no index has been built or loaded")]
    EngineNotReady,

    /// Search attempted against an index that was never built
    #[error("Vector index is not ready: build or load it before searching")]
    IndexNotReady,

    /// Persisted index snapshot missing or corrupt; rebuild from scratch
    #[error("Index snapshot unavailable at {path}: {reason}")]
    IndexUnavailable { path: String, reason: String },

    /// Query and corpus vectors differ in size; fatal configuration error
    #[error("Embedding dimension mismatch: index has {expected}, query produced {actual}")]
    EmbeddingDimensionMismatch { expected: usize, actual: usize },

    /// Corpus file missing or a record failed validation; no partial loads
    #[error("Corpus load failed: {0}")]
    CorpusLoad(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote generation call failed; callers must fall back locally
    #[error("Remote synthesis failed: {0}")]
    RemoteSynthesis(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for retrieval operations
pub type Result<T> = std::result::Result<T, RagError>;

impl From<anyhow::Error> for RagError {
    fn from(err: anyhow::Error) -> Self {
        RagError::Config(err.to_string())
    }
}
