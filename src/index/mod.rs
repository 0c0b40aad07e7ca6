//! Retrieval strategies
//!
//! Two interchangeable strategies implement `SearchStrategy`: the dense
//! vector index over chunk embeddings and the sparse keyword fallback over
//! whole documents. The façade holds one strategy chosen at construction
//! and never branches on type afterward.
//!
//! Score semantics differ by strategy (cosine similarity in [-1, 1] for
//! dense, query coverage in [0, 1] for sparse); callers must not compare
//! scores across strategies.

pub mod keyword;
pub mod vector;

pub use keyword::KeywordIndex;
pub use vector::{DenseStrategy, VectorIndex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Provenance for a retrieved passage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub doc_id: String,
    pub source: String,
    /// Full text of the owning document, so a chunk hit can be traced back
    /// without a corpus lookup
    pub original_text: String,
    /// Position of the chunk within its document; None for whole-document
    /// results from the keyword strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
}

/// A scored passage returned by a retrieval strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}

/// Common contract for the dense and sparse retrieval strategies
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// Strategy name for stats and logging
    fn name(&self) -> &'static str;

    /// Whether a built or loaded index is available for searching
    fn is_ready(&self) -> bool;

    /// Number of source documents behind the index
    fn document_count(&self) -> usize;

    /// Number of searchable units (chunks for dense, documents for sparse)
    fn unit_count(&self) -> usize;

    /// Return the top-k passages for a query, ordered by descending score
    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>>;
}
