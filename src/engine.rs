//! Retrieval engine façade
//!
//! Orchestrates "search then synthesize" over whichever strategy was
//! selected at construction. Strategy selection is a bootstrap concern;
//! the engine never branches on strategy type. Create one engine at
//! startup and pass it by reference to each request handler.

use std::sync::Arc;
use tracing::debug;

use crate::errors::{RagError, Result};
use crate::index::{SearchResult, SearchStrategy};
use crate::synthesis::{fallback, AnswerResult, AnswerSynthesizer};

/// Corpus and strategy counters for health reporting
#[derive(Debug, Clone, serde::Serialize)]
pub struct EngineStats {
    pub strategy: &'static str,
    pub ready: bool,
    pub documents: usize,
    pub units: usize,
}

/// Façade over one retrieval strategy and the answer synthesizer
pub struct RetrievalEngine {
    strategy: Arc<dyn SearchStrategy>,
    synthesizer: AnswerSynthesizer,
}

impl RetrievalEngine {
    pub fn new(strategy: Arc<dyn SearchStrategy>, synthesizer: AnswerSynthesizer) -> Self {
        Self {
            strategy,
            synthesizer,
        }
    }

    fn validate(&self, question: &str, k: usize) -> Result<()> {
        if question.trim().is_empty() {
            return Err(RagError::EmptyQuestion);
        }
        if k < 1 {
            return Err(RagError::InvalidTopK(k));
        }
        if !self.strategy.is_ready() {
            return Err(RagError::EngineNotReady);
        }
        Ok(())
    }

    /// Top-k passages for a question, uniform across strategies
    pub async fn search(&self, question: &str, k: usize) -> Result<Vec<SearchResult>> {
        self.validate(question, k)?;

        debug!(strategy = self.strategy.name(), k, "running search");
        self.strategy.search(question, k).await
    }

    /// Full query flow: retrieve passages, then synthesize an answer
    ///
    /// A ready strategy over zero documents answers with the templated
    /// "no data loaded" text. An empty result set over a populated corpus
    /// is not an error either; the synthesizer renders the templated
    /// "nothing relevant found" answer with no sources.
    pub async fn query(&self, question: &str, k: usize) -> Result<AnswerResult> {
        self.validate(question, k)?;

        if self.strategy.unit_count() == 0 {
            return Ok(AnswerResult {
                answer: fallback::NO_DATA_ANSWER.to_string(),
                sources: Vec::new(),
                query: question.to_string(),
            });
        }

        let passages = self.search(question, k).await?;
        Ok(self.synthesizer.synthesize(question, &passages).await)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            strategy: self.strategy.name(),
            ready: self.strategy.is_ready(),
            documents: self.strategy.document_count(),
            units: self.strategy.unit_count(),
        }
    }
}
