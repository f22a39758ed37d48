//! Application state for the API server

use std::sync::Arc;

use crate::config::AppConfig;
use crate::engine::{OllamaClient, RetrievalEngine};
use crate::error::Result;
use crate::ingestion::DocumentLoader;

/// Shared application state; one engine and loader per server instance
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    engine: RetrievalEngine,
    loader: DocumentLoader,
}

impl AppState {
    /// Build state over Ollama-backed providers
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let client = Arc::new(OllamaClient::new(&config.llm)?);
        let engine =
            RetrievalEngine::connect(config.clone(), client.clone(), client).await?;
        Ok(Self::new(config, engine))
    }

    /// Build state around an already-connected engine
    ///
    /// This is the seam the integration tests use to inject stub
    /// providers.
    pub fn new(config: AppConfig, engine: RetrievalEngine) -> Self {
        let loader = DocumentLoader::new(&config.chunking);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                engine,
                loader,
            }),
        }
    }

    /// Configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Retrieval engine
    pub fn engine(&self) -> &RetrievalEngine {
        &self.inner.engine
    }

    /// Document loader
    pub fn loader(&self) -> &DocumentLoader {
        &self.inner.loader
    }
}
