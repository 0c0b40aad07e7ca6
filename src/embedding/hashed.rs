//! Deterministic local embedding via signed feature hashing
//!
//! Hashes overlapping character n-grams into a fixed-dimension vector and
//! L2-normalizes the result. Character n-grams rather than whitespace tokens
//! so that unsegmented CJK text still shares features between query and
//! corpus.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::embedding::{l2_normalize, Embedder};
use crate::errors::Result;

const DEFAULT_DIMENSION: usize = 384;

/// Offline embedder producing reproducible unit vectors
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimension: usize,
}

impl HashedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        let chars: Vec<char> = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        if chars.is_empty() {
            return vector;
        }

        if chars.len() < 2 {
            self.add_feature(&mut vector, &chars.iter().collect::<String>());
        } else {
            for n in [2usize, 3] {
                if chars.len() < n {
                    continue;
                }
                for window in chars.windows(n) {
                    self.add_feature(&mut vector, &window.iter().collect::<String>());
                }
            }
        }

        l2_normalize(&mut vector);
        vector
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str) {
        let mut hasher = DefaultHasher::new();
        feature.hash(&mut hasher);
        let hash = hasher.finish();

        let bucket = (hash % self.dimension as u64) as usize;
        // One hash bit decides the sign so collisions partially cancel.
        let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashedEmbedder {
    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }
}
