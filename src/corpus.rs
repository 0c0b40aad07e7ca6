//! Document corpus loading
//!
//! The corpus is an ordered set of JSON records, loaded once per process or
//! per rebuild. A malformed record fails the whole load; partial corpora are
//! never exposed.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::errors::{RagError, Result};

/// A single source document, immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub doc_id: String,
    pub text: String,
    pub source: String,
}

/// Ordered, immutable document set
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Wrap an already-loaded document list
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Load the corpus from a JSON file of `{doc_id, text, source}` records
    ///
    /// A missing file or any record missing a field is a fatal load error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| {
            RagError::CorpusLoad(format!("{}: {}", path.display(), e))
        })?;

        let documents: Vec<Document> = serde_json::from_str(&contents).map_err(|e| {
            RagError::CorpusLoad(format!("{}: {}", path.display(), e))
        })?;

        info!(count = documents.len(), path = %path.display(), "loaded corpus");

        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_corpus() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"doc_id": "PMID_1", "text": "银屑病治疗研究", "source": "《中华皮肤科杂志》2024"}}]"#
        )
        .unwrap();

        let corpus = Corpus::load(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.documents()[0].doc_id, "PMID_1");
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"doc_id": "PMID_1", "text": "no source field"}}]"#).unwrap();

        let result = Corpus::load(file.path());
        assert!(matches!(result, Err(RagError::CorpusLoad(_))));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = Corpus::load("does-not-exist.json");
        assert!(matches!(result, Err(RagError::CorpusLoad(_))));
    }
}
