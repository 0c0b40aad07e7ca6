//! medrag - retrieval core for small-corpus medical document QA
//!
//! Turns raw documents into searchable units, finds the passages most
//! relevant to a question, and synthesizes an answer from them. Two
//! interchangeable retrieval strategies sit behind one contract:
//!
//! - **Dense**: overlapping character chunks embedded into unit vectors,
//!   ranked by cosine similarity (normalized inner product), persisted as
//!   an atomic snapshot.
//! - **Sparse**: whole-document keyword overlap scored by query coverage,
//!   usable without any embedding model.
//!
//! Answer synthesis prefers a remote generation call and always falls back
//! to a deterministic local composition on any failure. The HTTP layer,
//! process bootstrap, and sample-data generation live outside this crate.

pub mod chunker;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod engine;
pub mod errors;
pub mod index;
pub mod store;
pub mod synthesis;

// Re-export commonly used types
pub use chunker::Chunker;
pub use config::RagConfig;
pub use corpus::{Corpus, Document};
pub use embedding::{Embedder, HashedEmbedder, OllamaEmbedder};
pub use engine::{EngineStats, RetrievalEngine};
pub use errors::{RagError, Result};
pub use index::{DenseStrategy, KeywordIndex, SearchResult, SearchStrategy, VectorIndex};
pub use store::IndexStore;
pub use synthesis::{AnswerResult, AnswerSynthesizer, RemoteGenerator, RemoteOutcome};
