//! docqa: document Q&A with retrieval-augmented answers and citations
//!
//! A thin composition of three collaborators: per-format text extraction
//! plus chunking, a persistent embedded vector index, and a locally
//! hosted model service (Ollama) for embeddings and generation. The same
//! orchestration is exposed twice, as a REST API and as an interactive
//! chat session.

pub mod chat;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use engine::RetrievalEngine;
pub use error::{Error, Result};
pub use ingestion::DocumentLoader;
pub use types::{Chunk, ChunkSource, FileFormat, QueryOutcome};
