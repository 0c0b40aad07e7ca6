use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RagConfig {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Chunking parameters for the dense strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Endpoint for the HTTP embedding backend; None selects the local
    /// hashed embedder
    pub endpoint: Option<String>,
    /// Model name passed to the HTTP backend
    pub model: String,
    /// Dimension used by the local hashed embedder
    pub dimension: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "nomic-embed-text".to_string(),
            dimension: 384,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Chat-completions endpoint for remote answer generation
    pub api_url: String,
    /// Model name for the remote call
    pub model: String,
    /// API key; None disables the remote path entirely
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Excerpt budget in characters for attributed sources
    pub excerpt_chars: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            api_key: None,
            timeout_secs: 30,
            excerpt_chars: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default number of passages to retrieve per query
    pub top_k: usize,
    /// Path for the persisted index snapshot
    pub index_path: PathBuf,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            index_path: PathBuf::from("medrag_index.json"),
        }
    }
}

impl RagConfig {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = RagConfig::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: RagConfig = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".medrag").join("config.toml"))
    }

    /// API key from config, falling back to the environment
    pub fn api_key(&self) -> Option<String> {
        self.synthesis
            .api_key
            .clone()
            .or_else(|| std::env::var("MEDRAG_API_KEY").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.overlap, 50);
        assert_eq!(config.retrieval.top_k, 3);
        assert!(config.embedding.endpoint.is_none());
        assert!(config.synthesis.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = RagConfig::default();
        config.synthesis.model = "deepseek-chat".to_string();
        config.embedding.dimension = 512;

        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("deepseek-chat"));

        let deserialized: RagConfig = toml::from_str(&toml_string).unwrap();
        assert_eq!(deserialized.embedding.dimension, 512);
        assert_eq!(deserialized.chunking.chunk_size, 500);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RagConfig = toml::from_str("[chunking]\nchunk_size = 200\noverlap = 20\n").unwrap();
        assert_eq!(config.chunking.chunk_size, 200);
        assert_eq!(config.retrieval.top_k, 3);
    }
}
