//! Answer synthesis from ranked passages
//!
//! Prefers one bounded remote generation call; any non-success outcome is
//! converted into the deterministic local fallback, which always succeeds.
//! Sources are always derived from the ranked passages regardless of which
//! path produced the answer.

pub mod fallback;
pub mod remote;

pub use remote::{RemoteGenerator, RemoteOutcome};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RagConfig;
use crate::errors::Result;
use crate::index::SearchResult;

/// One attributed source backing an answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRef {
    pub doc_id: String,
    pub source: String,
    pub excerpt: String,
}

/// Final answer with attributed sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub query: String,
}

/// Turns a query and ranked passages into an answer
pub struct AnswerSynthesizer {
    remote: Option<RemoteGenerator>,
    excerpt_chars: usize,
}

impl AnswerSynthesizer {
    pub fn new(remote: Option<RemoteGenerator>, excerpt_chars: usize) -> Self {
        Self {
            remote,
            excerpt_chars,
        }
    }

    /// Synthesizer with no remote capability; always composes locally
    pub fn local_only() -> Self {
        Self::new(None, 100)
    }

    /// Assemble from configuration; no API key means no remote path
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let remote = match config.api_key() {
            Some(key) => Some(RemoteGenerator::new(
                config.synthesis.api_url.clone(),
                key,
                config.synthesis.model.clone(),
                Duration::from_secs(config.synthesis.timeout_secs),
            )?),
            None => None,
        };

        Ok(Self::new(remote, config.synthesis.excerpt_chars))
    }

    /// Produce an answer; this never fails
    pub async fn synthesize(&self, query: &str, passages: &[SearchResult]) -> AnswerResult {
        if passages.is_empty() {
            return AnswerResult {
                answer: fallback::NO_RELEVANT_ANSWER.to_string(),
                sources: Vec::new(),
                query: query.to_string(),
            };
        }

        let context = passages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let answer = match &self.remote {
            Some(remote) => match remote.generate(query, &context).await {
                RemoteOutcome::Success(text) => {
                    debug!("remote synthesis succeeded");
                    text
                }
                RemoteOutcome::Failure(reason) => {
                    warn!(%reason, "remote synthesis failed, composing locally");
                    fallback::compose(query, &context)
                }
            },
            None => fallback::compose(query, &context),
        };

        let sources = passages
            .iter()
            .map(|p| SourceRef {
                doc_id: p.metadata.doc_id.clone(),
                source: p.metadata.source.clone(),
                excerpt: excerpt(&p.content, self.excerpt_chars),
            })
            .collect();

        AnswerResult {
            answer,
            sources,
            query: query.to_string(),
        }
    }
}

/// Bounded-length excerpt with a truncation marker, never cut mid-char
fn excerpt(text: &str, limit: usize) -> String {
    let mut taken: String = text.chars().take(limit).collect();
    if taken.len() < text.len() {
        taken.push_str("...");
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ChunkMetadata;
    use std::time::Duration;

    fn passage(doc_id: &str, content: &str, score: f32) -> SearchResult {
        SearchResult {
            content: content.to_string(),
            metadata: ChunkMetadata {
                doc_id: doc_id.to_string(),
                source: "《中华皮肤科杂志》2024".to_string(),
                original_text: content.to_string(),
                chunk_index: Some(0),
            },
            score,
        }
    }

    #[test]
    fn test_excerpt_truncates_with_marker() {
        let text = "银".repeat(150);
        let result = excerpt(&text, 100);
        assert!(result.ends_with("..."));
        assert_eq!(result.chars().count(), 103);
    }

    #[test]
    fn test_excerpt_keeps_short_text_unmarked() {
        assert_eq!(excerpt("短文本", 100), "短文本");
    }

    #[test]
    fn test_from_config_without_key_is_local_only() {
        let config = RagConfig::default();
        let synthesizer = AnswerSynthesizer::from_config(&config).unwrap();
        assert!(synthesizer.remote.is_none());
        assert_eq!(synthesizer.excerpt_chars, 100);
    }

    #[tokio::test]
    async fn test_empty_passages_yield_no_relevant_answer() {
        let synthesizer = AnswerSynthesizer::local_only();
        let result = synthesizer.synthesize("银屑病？", &[]).await;

        assert_eq!(result.answer, fallback::NO_RELEVANT_ANSWER);
        assert!(result.sources.is_empty());
        assert_eq!(result.query, "银屑病？");
    }

    #[tokio::test]
    async fn test_local_synthesis_attributes_all_passages() {
        let synthesizer = AnswerSynthesizer::local_only();
        let passages = vec![
            passage("PMID_1", "银屑病研究一。", 0.9),
            passage("PMID_2", "银屑病研究二。", 0.7),
        ];

        let result = synthesizer.synthesize("白癜风治疗？", &passages).await;

        assert!(!result.answer.is_empty());
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].doc_id, "PMID_1");
        assert_eq!(result.sources[1].doc_id, "PMID_2");
        assert_eq!(result.sources[0].excerpt, "银屑病研究一。");
    }

    #[tokio::test]
    async fn test_failing_remote_still_returns_answer() {
        let remote = RemoteGenerator::new(
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
            "sk-test".to_string(),
            "deepseek-chat".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        let synthesizer = AnswerSynthesizer::new(Some(remote), 100);

        let passages = vec![passage("PMID_1", "银屑病生物制剂研究。", 0.9)];
        let result = synthesizer
            .synthesize("银屑病生物制剂有哪些？", &passages)
            .await;

        assert!(!result.answer.is_empty());
        assert_eq!(result.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_sources_come_from_passages_even_with_canned_answer() {
        let synthesizer = AnswerSynthesizer::local_only();
        let passages = vec![passage("PMID_9", "某篇文献内容。", 0.5)];

        let result = synthesizer
            .synthesize("银屑病生物制剂有哪些？", &passages)
            .await;

        // Canned topic answer, but attribution still follows the passages.
        assert!(result.answer.contains("TNF-α抑制剂"));
        assert_eq!(result.sources[0].doc_id, "PMID_9");
    }
}
