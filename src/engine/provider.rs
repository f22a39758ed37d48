//! Provider traits for the embedding and generative model services

use async_trait::async_trait;

use crate::error::Result;

/// Trait for generating text embeddings
///
/// One collection only ever sees vectors from one implementation; the
/// engine embeds questions with the same provider it ingested with.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Model identifier, for stats and logging
    fn model(&self) -> &str;
}

/// Trait for answer generation
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Generate text for a fully assembled prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Model identifier, for stats and logging
    fn model(&self) -> &str;
}
