//! Dense retrieval: chunk embeddings under normalized inner product
//!
//! `VectorIndex` is immutable after construction; rebuilding constructs a
//! new index and swaps it in, never mutates in place. The vector, chunk
//! text, and metadata lists are always the same length and order; index i
//! is the sole join key.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::chunker::Chunker;
use crate::config::RagConfig;
use crate::corpus::Document;
use crate::embedding::{l2_normalize, Embedder, HashedEmbedder, OllamaEmbedder};
use crate::errors::{RagError, Result};
use crate::index::{ChunkMetadata, SearchResult, SearchStrategy};
use crate::store::IndexStore;

/// Immutable similarity-searchable index over chunk vectors
#[derive(Debug, Clone)]
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
    chunk_texts: Vec<String>,
    chunk_metadata: Vec<ChunkMetadata>,
    dimension: usize,
    document_count: usize,
}

impl VectorIndex {
    /// Chunk and embed every document into a fresh index
    pub async fn build(
        documents: &[Document],
        chunker: &Chunker,
        embedder: &dyn Embedder,
    ) -> Result<Self> {
        let mut chunk_texts = Vec::new();
        let mut chunk_metadata = Vec::new();

        for doc in documents {
            for (chunk_index, text) in chunker.split(&doc.text).into_iter().enumerate() {
                chunk_texts.push(text);
                chunk_metadata.push(ChunkMetadata {
                    doc_id: doc.doc_id.clone(),
                    source: doc.source.clone(),
                    original_text: doc.text.clone(),
                    chunk_index: Some(chunk_index),
                });
            }
        }

        let mut vectors = embedder.embed_batch(&chunk_texts).await?;
        for vector in &mut vectors {
            l2_normalize(vector);
        }

        let index = Self::from_parts(vectors, chunk_texts, chunk_metadata)?;
        info!(
            chunks = index.len(),
            documents = index.document_count,
            dimension = index.dimension,
            "built vector index"
        );
        Ok(index)
    }

    /// Assemble an index from aligned parts, validating the invariants
    ///
    /// Used by both `build` and snapshot restore; rejects misaligned lists
    /// and mixed vector dimensions so a partial state is never exposed.
    pub fn from_parts(
        vectors: Vec<Vec<f32>>,
        chunk_texts: Vec<String>,
        chunk_metadata: Vec<ChunkMetadata>,
    ) -> Result<Self> {
        if vectors.len() != chunk_texts.len() || vectors.len() != chunk_metadata.len() {
            return Err(RagError::Config(format!(
                "misaligned index parts: {} vectors, {} texts, {} metadata",
                vectors.len(),
                chunk_texts.len(),
                chunk_metadata.len()
            )));
        }

        let dimension = vectors.first().map_or(0, Vec::len);
        for vector in &vectors {
            if vector.len() != dimension {
                return Err(RagError::EmbeddingDimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
        }

        let document_count = chunk_metadata
            .iter()
            .map(|m| m.doc_id.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Ok(Self {
            vectors,
            chunk_texts,
            chunk_metadata,
            dimension,
            document_count,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn chunk_texts(&self) -> &[String] {
        &self.chunk_texts
    }

    pub fn chunk_metadata(&self) -> &[ChunkMetadata] {
        &self.chunk_metadata
    }

    /// Indices and scores of the k nearest chunks by inner product
    ///
    /// Ordered by descending score, ties broken by ascending chunk index so
    /// the ordering is reproducible for identical inputs.
    pub fn top_k(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if self.vectors.is_empty() {
            return Err(RagError::IndexNotReady);
        }
        if query.len() != self.dimension {
            return Err(RagError::EmbeddingDimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, v.iter().zip(query).map(|(a, b)| a * b).sum()))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);

        Ok(scored)
    }
}

/// Dense strategy: owns the chunker, the embedder, and the current index
///
/// The index slot is an atomic snapshot swap: in-flight searches keep their
/// `Arc` and finish against a consistent index while a rebuild installs a
/// new one. Rebuilds are serialized; at most one build runs at a time.
pub struct DenseStrategy {
    chunker: Chunker,
    embedder: Arc<dyn Embedder>,
    index: RwLock<Option<Arc<VectorIndex>>>,
    build_lock: tokio::sync::Mutex<()>,
}

impl DenseStrategy {
    pub fn new(chunker: Chunker, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            chunker,
            embedder,
            index: RwLock::new(None),
            build_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Assemble the strategy from configuration
    ///
    /// A configured embedding endpoint selects the HTTP backend; otherwise
    /// the local hashed embedder is used.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let chunker = Chunker::new(config.chunking.chunk_size, config.chunking.overlap)?;

        let embedder: Arc<dyn Embedder> = match &config.embedding.endpoint {
            Some(endpoint) => Arc::new(OllamaEmbedder::new(
                endpoint.clone(),
                config.embedding.model.clone(),
                std::time::Duration::from_secs(config.embedding.timeout_secs),
            )?),
            None => Arc::new(HashedEmbedder::new(config.embedding.dimension)),
        };

        Ok(Self::new(chunker, embedder))
    }

    /// Current index snapshot, if one has been built or loaded
    ///
    /// The slot only ever holds a complete index, so a poisoned lock is
    /// recovered rather than treated as empty.
    pub fn snapshot(&self) -> Option<Arc<VectorIndex>> {
        let guard = self.index.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    fn install(&self, index: VectorIndex) {
        let mut guard = self.index.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Arc::new(index));
    }

    /// Build a fresh index from the documents and swap it in
    pub async fn rebuild(&self, documents: &[Document]) -> Result<()> {
        let _guard = self.build_lock.lock().await;
        let index = VectorIndex::build(documents, &self.chunker, self.embedder.as_ref()).await?;
        self.install(index);
        Ok(())
    }

    /// Restore the index from a snapshot, rebuilding from scratch if the
    /// snapshot is missing or corrupt
    pub async fn load_or_build(&self, store: &IndexStore, documents: &[Document]) -> Result<()> {
        match store.load() {
            Ok(index) => {
                self.install(index);
                Ok(())
            }
            Err(RagError::IndexUnavailable { path, reason }) => {
                warn!(%path, %reason, "index snapshot unavailable, rebuilding");
                self.rebuild(documents).await?;
                if let Some(index) = self.snapshot() {
                    store.save(&index)?;
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SearchStrategy for DenseStrategy {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn is_ready(&self) -> bool {
        self.snapshot().is_some_and(|index| !index.is_empty())
    }

    fn document_count(&self) -> usize {
        self.snapshot().map_or(0, |index| index.document_count())
    }

    fn unit_count(&self) -> usize {
        self.snapshot().map_or(0, |index| index.len())
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let index = self.snapshot().ok_or(RagError::IndexNotReady)?;

        let mut query_vector = self.embedder.embed(query).await?;
        l2_normalize(&mut query_vector);

        let ranked = index.top_k(&query_vector, k)?;

        Ok(ranked
            .into_iter()
            .map(|(i, score)| SearchResult {
                content: index.chunk_texts()[i].clone(),
                metadata: index.chunk_metadata()[i].clone(),
                score,
            })
            .collect())
    }
}
