//! Embedding backends
//!
//! Embedding is an external capability behind the `Embedder` trait. The
//! crate ships two backends: a deterministic local feature-hashing embedder
//! that always works offline, and an HTTP embedder for an Ollama-style
//! endpoint. The dense index fixes its dimension from the first vector it
//! stores and rejects mismatched query vectors.

pub mod hashed;
pub mod ollama;

pub use hashed::HashedEmbedder;
pub use ollama::OllamaEmbedder;

use async_trait::async_trait;

use crate::errors::Result;

/// Maps arbitrary text to a fixed-dimension vector
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Vector dimension, once known
    ///
    /// The local backend knows it at construction; the HTTP backend pins
    /// it on the first successful call and reports None before that.
    fn dimension(&self) -> Option<usize>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

/// Scale a vector to unit L2 norm in place
///
/// Applied identically at build time and query time so that inner product
/// equals cosine similarity. A zero vector is left unchanged.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_normalize_unit_norm() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector_unchanged() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }
}
