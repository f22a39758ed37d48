//! Interactive chat front end
//!
//! A session owns its own engine and loader (no state shared with the
//! API server) and keeps the running conversation transcript in memory
//! for its lifetime.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::engine::{OllamaClient, RetrievalEngine};
use crate::error::{Error, Result};
use crate::ingestion::DocumentLoader;
use crate::types::{FileFormat, QueryOutcome};

/// Who said what in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// An interactive Q&A session with an in-memory transcript
pub struct ChatSession {
    engine: RetrievalEngine,
    loader: DocumentLoader,
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    /// Connect a session over Ollama-backed providers
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let client = Arc::new(OllamaClient::new(&config.llm)?);
        let engine =
            RetrievalEngine::connect(config.clone(), client.clone(), client).await?;
        Ok(Self::new(&config, engine))
    }

    /// Build a session around an already-connected engine
    pub fn new(config: &AppConfig, engine: RetrievalEngine) -> Self {
        Self {
            engine,
            loader: DocumentLoader::new(&config.chunking),
            transcript: Vec::new(),
        }
    }

    /// Chunk and ingest the given files, returning the chunk count
    pub async fn upload(&mut self, paths: &[PathBuf]) -> Result<usize> {
        if paths.is_empty() {
            return Err(Error::empty_input("no files provided"));
        }

        // Same pre-check the API surface does before the loader runs
        for path in paths {
            let name = path.to_string_lossy();
            if FileFormat::from_name(&name).is_none() {
                let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
                return Err(Error::UnsupportedType(format!(".{}", ext)));
            }
        }

        let chunks = self.loader.process(paths)?;
        if chunks.is_empty() {
            return Err(Error::empty_input("no content extracted from documents"));
        }
        self.engine.ingest(chunks).await
    }

    /// Ask a question, recording both turns in the transcript
    pub async fn ask(&mut self, question: &str) -> QueryOutcome {
        self.transcript.push(ChatTurn {
            role: ChatRole::User,
            content: question.to_string(),
        });

        let outcome = self.engine.answer(question).await;

        self.transcript.push(ChatTurn {
            role: ChatRole::Assistant,
            content: outcome.answer.clone(),
        });

        outcome
    }

    /// The conversation so far
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Whether any documents are loaded
    pub fn documents_loaded(&self) -> bool {
        self.engine.is_ready()
    }

    /// Current index entry count
    pub fn stats(&self) -> usize {
        self.engine.stats()
    }

    /// Clear the index and forget the conversation
    pub fn clear(&mut self) -> bool {
        let cleared = self.engine.clear();
        if cleared {
            self.transcript.clear();
        }
        cleared
    }
}

/// Truncate chunk text for the citation panel
pub fn citation_preview(content: &str, limit: usize) -> String {
    let preview: String = content.chars().take(limit).collect();
    if content.chars().count() > limit {
        format!("{}...", preview)
    } else {
        preview
    }
}
