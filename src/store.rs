//! Index snapshot persistence
//!
//! Serializes the vector index state (vectors + aligned chunk texts +
//! aligned metadata) as one atomic unit. Writes go to a temp path and are
//! renamed over the target so a crash never leaves a loadable-but-
//! inconsistent snapshot. A missing or corrupt snapshot is
//! `IndexUnavailable`; callers treat that as "rebuild from scratch".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{RagError, Result};
use crate::index::{ChunkMetadata, VectorIndex};

/// On-disk form of a built vector index
#[derive(Debug, Serialize, Deserialize)]
struct IndexSnapshot {
    vectors: Vec<Vec<f32>>,
    chunk_texts: Vec<String>,
    chunk_metadata: Vec<ChunkMetadata>,
    saved_at: DateTime<Utc>,
}

/// Saves and loads vector index snapshots at a fixed path
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the index state; commit is atomic via rename
    pub fn save(&self, index: &VectorIndex) -> Result<()> {
        let snapshot = IndexSnapshot {
            vectors: index.vectors().to_vec(),
            chunk_texts: index.chunk_texts().to_vec(),
            chunk_metadata: index.chunk_metadata().to_vec(),
            saved_at: Utc::now(),
        };

        let json = serde_json::to_string(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        info!(chunks = index.len(), path = %self.path.display(), "saved index snapshot");
        Ok(())
    }

    /// Restore an index from the snapshot
    ///
    /// Any failure (missing file, unreadable content, misaligned state) maps
    /// to `IndexUnavailable`; a partial load is never returned.
    pub fn load(&self) -> Result<VectorIndex> {
        let unavailable = |reason: String| RagError::IndexUnavailable {
            path: self.path.display().to_string(),
            reason,
        };

        let contents = fs::read_to_string(&self.path).map_err(|e| unavailable(e.to_string()))?;

        let snapshot: IndexSnapshot =
            serde_json::from_str(&contents).map_err(|e| unavailable(e.to_string()))?;

        let index = VectorIndex::from_parts(
            snapshot.vectors,
            snapshot.chunk_texts,
            snapshot.chunk_metadata,
        )
        .map_err(|e| unavailable(e.to_string()))?;

        info!(chunks = index.len(), path = %self.path.display(), "loaded index snapshot");
        Ok(index)
    }
}
