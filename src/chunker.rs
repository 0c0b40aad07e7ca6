//! Overlapping fixed-size text chunking
//!
//! Chunk boundaries are character-count based so they are reproducible
//! across runs and platforms, and always fall on char boundaries.

use crate::errors::{RagError, Result};

/// Splits document text into overlapping fixed-size passages
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker; `overlap` must be smaller than `chunk_size`
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be positive".to_string()));
        }
        if overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into ordered overlapping chunks
    ///
    /// Text shorter than the chunk size yields exactly one chunk equal to
    /// the input; empty text yields no chunks. No chunk is ever empty.
    pub fn split(&self, text: &str) -> Vec<String> {
        // Byte offset of every char boundary, plus the end of the text.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());

        let total_chars = boundaries.len() - 1;
        if total_chars == 0 {
            return Vec::new();
        }
        if total_chars <= self.chunk_size {
            return vec![text.to_string()];
        }

        let stride = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(total_chars);
            chunks.push(text[boundaries[start]..boundaries[end]].to_string());
            if end == total_chars {
                break;
            }
            start += stride;
        }

        chunks
    }
}
