//! Retrieval engine: ingest, answer, stats, clear
//!
//! The engine is a two-state machine. Empty means no collection is
//! loaded; Ready means a collection is open and questions retrieve from
//! it. Construction probes the generative service and reopens a
//! previously persisted collection when one exists.

pub mod ollama;
pub mod prompt;
pub mod provider;

pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
pub use provider::{EmbeddingProvider, GenerativeProvider};

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::index::{IndexEntry, VectorIndex};
use crate::types::{Chunk, QueryOutcome, SourceChunk};

/// Retrieval-augmented answering over one persistent collection
///
/// Operations are issued sequentially by a single caller; the lock exists
/// so `&self` methods compose with shared front-end state, not to make
/// concurrent `clear`/`answer` against one collection well-defined (that
/// race stays a documented hazard: the answer side may observe a missing
/// collection and degrade to its sentinel).
pub struct RetrievalEngine {
    config: AppConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerativeProvider>,
    /// None = Empty, Some = Ready
    index: RwLock<Option<VectorIndex>>,
}

impl RetrievalEngine {
    /// Connect the engine to its model services and storage
    ///
    /// An unreachable generative service is a hard failure here so the
    /// operator can diagnose connectivity; per-call failures later are
    /// swallowed into answer-shaped data instead.
    pub async fn connect(
        config: AppConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerativeProvider>,
    ) -> Result<Self> {
        let reachable = generator.health_check().await.unwrap_or(false);
        if !reachable {
            return Err(Error::ServiceUnreachable(format!(
                "generative model service is not reachable at {}",
                config.llm.base_url
            )));
        }

        let index = VectorIndex::open(&config.index.persist_dir, &config.index.collection)?;
        if index.is_some() {
            tracing::info!("Reopened persisted collection '{}'", config.index.collection);
        }

        Ok(Self {
            config,
            embedder,
            generator,
            index: RwLock::new(index),
        })
    }

    /// Whether a collection is loaded
    pub fn is_ready(&self) -> bool {
        self.index.read().is_some()
    }

    /// Whether the generative service currently answers its health probe
    pub async fn service_available(&self) -> bool {
        self.generator.health_check().await.unwrap_or(false)
    }

    /// Embedding model identifier
    pub fn embed_model(&self) -> &str {
        self.embedder.model()
    }

    /// Generation model identifier
    pub fn generate_model(&self) -> &str {
        self.generator.model()
    }

    /// Embed and store a batch of chunks, creating the collection if absent
    ///
    /// Appends on repeat calls; duplicates are accepted, not deduplicated.
    /// Returns the number of chunks just added.
    pub async fn ingest(&self, chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            return Err(Error::empty_input("no chunks to ingest"));
        }

        // Embed sequentially before touching the collection; a failing
        // embed leaves the index untouched
        let mut entries = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = self.embedder.embed(&chunk.content).await?;
            entries.push(IndexEntry {
                id: chunk.id,
                text: chunk.content,
                vector,
                source: chunk.source,
            });
        }

        let added = {
            let mut guard = self.index.write();
            match guard.as_mut() {
                Some(index) => index.upsert(entries)?,
                None => {
                    let mut index = VectorIndex::open_or_create(
                        &self.config.index.persist_dir,
                        &self.config.index.collection,
                    )?;
                    let added = index.upsert(entries)?;
                    *guard = Some(index);
                    added
                }
            }
        };

        tracing::info!(
            "Ingested {} chunks into '{}'",
            added,
            self.config.index.collection
        );
        Ok(added)
    }

    /// Answer a question from the loaded collection
    ///
    /// Never fails: the Empty state yields the no-documents sentinel, and
    /// embedding/generation failures come back as data with the `error`
    /// flag set, so front ends can treat this call as always succeeding.
    pub async fn answer(&self, question: &str) -> QueryOutcome {
        if !self.is_ready() {
            return QueryOutcome::no_documents();
        }

        let query_vector = match self.embedder.embed(question).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Question embedding failed: {}", e);
                return QueryOutcome::failure(e);
            }
        };

        // The collection may have been cleared while embedding; treat
        // that the same as the Empty state rather than crashing
        let hits = {
            let guard = self.index.read();
            match guard.as_ref() {
                Some(index) => index.search(&query_vector, self.config.retrieval.top_k),
                None => return QueryOutcome::no_documents(),
            }
        };

        let context = PromptBuilder::build_context(&hits);
        let prompt = PromptBuilder::build_qa_prompt(question, &context);

        let answer = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Generation failed: {}", e);
                return QueryOutcome::failure(e);
            }
        };

        let sources = hits
            .into_iter()
            .map(|hit| SourceChunk {
                content: hit.text,
                metadata: hit.source,
                score: hit.score,
            })
            .collect();

        QueryOutcome {
            answer,
            sources,
            error: false,
        }
    }

    /// Current total entry count; 0 in the Empty state and on any
    /// counting failure
    pub fn stats(&self) -> usize {
        self.index.read().as_ref().map(VectorIndex::count).unwrap_or(0)
    }

    /// Delete the collection and return to Empty; best-effort
    pub fn clear(&self) -> bool {
        let mut guard = self.index.write();
        match guard.take() {
            Some(index) => match index.delete() {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Failed to clear collection: {}", e);
                    false
                }
            },
            // Nothing loaded; clearing nothing succeeds
            None => true,
        }
    }
}
