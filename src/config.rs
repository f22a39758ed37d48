//! Configuration for the document Q&A system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main application configuration
///
/// Constructed once at process start and read-only thereafter. Both front
/// ends build their Loader and Engine from a clone of this value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Vector index configuration
    #[serde(default)]
    pub index: IndexConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub generate_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Temperature for generation (0.0 = deterministic Q&A)
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            generate_model: "llama3.2:latest".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding persisted collections
    pub persist_dir: PathBuf,
    /// Logical collection name
    pub collection: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        let persist_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docqa")
            .join("index");

        Self {
            persist_dir,
            collection: "document_qa".to_string(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest chunks fetched per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// File extensions accepted by the loader and both front ends
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "txt", "docx", "md"];

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any section the file omits
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the given path when present, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            _ => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Validate cross-field invariants
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("top_k must be at least 1".to_string()));
        }
        if self.index.collection.is_empty() {
            return Err(Error::Config("collection name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Serializable view of the configuration for `GET /config`
    ///
    /// Everything here is already non-secret, but the snapshot keeps the
    /// wire shape stable independent of internal struct layout.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "ollama_base_url": self.llm.base_url,
            "ollama_model": self.llm.generate_model,
            "embedding_model": self.llm.embed_model,
            "collection_name": self.index.collection,
            "chunk_size": self.chunking.chunk_size,
            "chunk_overlap": self.chunking.chunk_overlap,
            "top_k_results": self.retrieval.top_k,
            "supported_extensions": SUPPORTED_EXTENSIONS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk_size() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_overlays_defaults() {
        let raw = r#"
            [chunking]
            chunk_size = 200
            chunk_overlap = 20
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.chunking.chunk_size, 200);
        assert_eq!(config.llm.base_url, "http://localhost:11434");
    }

    #[test]
    fn snapshot_carries_model_names() {
        let config = AppConfig::default();
        let snap = config.snapshot();
        assert_eq!(snap["ollama_model"], "llama3.2:latest");
        assert_eq!(snap["embedding_model"], "nomic-embed-text");
    }
}
