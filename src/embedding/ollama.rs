//! HTTP embedding backend for an Ollama-style endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::OnceLock;
use std::time::Duration;

use crate::embedding::{l2_normalize, Embedder};
use crate::errors::{RagError, Result};

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embedder backed by POST /api/embeddings on an Ollama server
///
/// The vector dimension is pinned by the first successful call; a response
/// of any other length is a fatal configuration error.
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dimension: OnceLock<usize>,
}

impl OllamaEmbedder {
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            model,
            dimension: OnceLock::new(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    /// Dimension observed on the first successful call, if any yet
    fn dimension(&self) -> Option<usize> {
        self.dimension.get().copied()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "model": self.model, "prompt": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RagError::Config(format!(
                "Embedding endpoint returned {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        let mut vector = body.embedding;

        let expected = *self.dimension.get_or_init(|| vector.len());
        if vector.len() != expected {
            return Err(RagError::EmbeddingDimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }

        l2_normalize(&mut vector);
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OllamaEmbedder::new(
            "http://127.0.0.1:11434".to_string(),
            "nomic-embed-text".to_string(),
            Duration::from_secs(30),
        )
        .unwrap();
        assert!(embedder.dimension().is_none());
    }

    #[tokio::test]
    #[ignore] // Requires Ollama running
    async fn test_embed_integration() {
        let embedder = OllamaEmbedder::new(
            "http://127.0.0.1:11434".to_string(),
            "nomic-embed-text".to_string(),
            Duration::from_secs(30),
        )
        .unwrap();
        let vector = embedder.embed("test text").await.unwrap();
        assert!(!vector.is_empty());
        assert_eq!(embedder.dimension(), Some(vector.len()));
    }
}
