//! Offline test doubles for the model services
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use docqa::config::AppConfig;
use docqa::engine::{EmbeddingProvider, GenerativeProvider};
use docqa::error::{Error, Result};
use docqa::types::{Chunk, ChunkSource, FileFormat};

/// Keyword-count embedding: deterministic, and questions about France
/// land measurably closer to chunks about France than to anything else
const KEYWORDS: [&str; 4] = ["france", "paris", "capital", "rust"];

pub struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn model(&self) -> &str {
        "stub-embed"
    }
}

/// Generator that records every prompt it is handed
pub struct RecordingGenerator {
    pub prompts: Mutex<Vec<String>>,
    reply: String,
}

impl RecordingGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl GenerativeProvider for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn model(&self) -> &str {
        "stub-llm"
    }
}

/// Generator whose health probe succeeds but whose calls always fail
pub struct FailingGenerator;

#[async_trait]
impl GenerativeProvider for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::model("connection reset by peer"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn model(&self) -> &str {
        "stub-llm-down"
    }
}

/// Generator that never answers its health probe
pub struct UnreachableGenerator;

#[async_trait]
impl GenerativeProvider for UnreachableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::model("unreachable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn model(&self) -> &str {
        "stub-llm-unreachable"
    }
}

/// Configuration pointed at a scratch index directory
pub fn test_config(dir: &tempfile::TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.index.persist_dir = dir.path().to_path_buf();
    config.index.collection = "test_docs".to_string();
    config
}

/// A chunk the way the loader would produce it
pub fn chunk(content: &str, filename: &str, index: u32) -> Chunk {
    Chunk::new(
        content.to_string(),
        ChunkSource {
            filename: filename.to_string(),
            format: FileFormat::Text,
            page: None,
            chunk_index: index,
        },
    )
}
