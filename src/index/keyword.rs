//! Sparse fallback retrieval: keyword overlap at document granularity
//!
//! Trades precision for the ability to run without an embedding model.
//! Scoring is query coverage (fraction of distinct query tokens found in
//! the document), deliberately asymmetric rather than Jaccard.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::corpus::Document;
use crate::errors::Result;
use crate::index::{ChunkMetadata, SearchResult, SearchStrategy};

/// Minimum token length kept in the postings; shorter runs are stop-noise
const MIN_POSTING_TOKEN_CHARS: usize = 3;

/// Lowercased alphanumeric runs (underscore counts as alphanumeric)
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverted token index over whole documents
pub struct KeywordIndex {
    documents: Vec<Document>,
    postings: HashMap<String, Vec<String>>,
}

impl KeywordIndex {
    /// Build token → doc_id postings from the raw document set
    pub fn build(documents: Vec<Document>) -> Self {
        let mut postings: HashMap<String, Vec<String>> = HashMap::new();

        for doc in &documents {
            let mut seen = HashSet::new();
            for token in tokenize(&doc.text) {
                if token.chars().count() >= MIN_POSTING_TOKEN_CHARS && seen.insert(token.clone()) {
                    postings.entry(token).or_default().push(doc.doc_id.clone());
                }
            }
        }

        info!(
            documents = documents.len(),
            tokens = postings.len(),
            "built keyword index"
        );

        Self {
            documents,
            postings,
        }
    }

    /// Doc ids containing a token, if it made it into the postings
    pub fn postings(&self, token: &str) -> Option<&[String]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    /// Fraction of distinct query tokens present in the document text
    ///
    /// The postings length filter does not apply here; scoring sees every
    /// token on both sides.
    pub fn score(query: &str, doc_text: &str) -> f32 {
        let query_tokens: HashSet<String> = tokenize(query).into_iter().collect();
        if query_tokens.is_empty() {
            return 0.0;
        }

        let doc_tokens: HashSet<String> = tokenize(doc_text).into_iter().collect();
        let matched = query_tokens.intersection(&doc_tokens).count();

        matched as f32 / query_tokens.len() as f32
    }
}

#[async_trait]
impl SearchStrategy for KeywordIndex {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn document_count(&self) -> usize {
        self.documents.len()
    }

    fn unit_count(&self) -> usize {
        self.documents.len()
    }

    /// Score every document, keep corpus order on ties, drop zero scores
    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let mut scored: Vec<(f32, &Document)> = self
            .documents
            .iter()
            .map(|doc| (Self::score(query, &doc.text), doc))
            .collect();

        // Stable sort: equal scores keep original corpus order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .filter(|(score, _)| *score > 0.0)
            .map(|(score, doc)| SearchResult {
                content: doc.text.clone(),
                metadata: ChunkMetadata {
                    doc_id: doc.doc_id.clone(),
                    source: doc.source.clone(),
                    original_text: doc.text.clone(),
                    chunk_index: None,
                },
                score,
            })
            .collect())
    }
}
