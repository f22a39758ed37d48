//! Core data types: chunks, provenance, and query results

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported document formats, resolved once from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Pdf,
    Text,
    Docx,
    Markdown,
}

impl FileFormat {
    /// Resolve a format from a lowercased extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            "docx" => Some(Self::Docx),
            "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Resolve a format from a file name or path string
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(&ext.to_lowercase())
    }
}

/// Provenance metadata attached to every chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Source file name
    pub filename: String,
    /// Document format
    pub format: FileFormat,
    /// Originating page, when the format knows one
    pub page: Option<u32>,
    /// Position of the chunk within its source file
    pub chunk_index: u32,
}

/// A unit of retrievable text plus provenance; never mutated after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Opaque identifier
    pub id: Uuid,
    /// Extracted text content
    pub content: String,
    /// Where the text came from
    pub source: ChunkSource,
}

impl Chunk {
    /// Create a new chunk with a fresh identifier
    pub fn new(content: String, source: ChunkSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            source,
        }
    }
}

/// A retrieved chunk returned as citation evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceChunk {
    /// Chunk text supplied as generation context
    pub content: String,
    /// Provenance metadata
    pub metadata: ChunkSource,
    /// Cosine similarity to the question (0.0-1.0, higher is closer)
    pub score: f32,
}

/// Result of answering one question; transient, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Generated answer, or a sentinel/error description
    pub answer: String,
    /// Chunks supplied as generation context, in retrieval order
    pub sources: Vec<SourceChunk>,
    /// True when the answer describes a swallowed embedding/generation
    /// failure rather than model output
    pub error: bool,
}

impl QueryOutcome {
    /// Sentinel returned when no documents are loaded; a valid terminal
    /// response, not an error
    pub fn no_documents() -> Self {
        Self {
            answer: "No documents loaded. Please upload documents first.".to_string(),
            sources: Vec::new(),
            error: false,
        }
    }

    /// Failure converted into an answer-shaped response
    pub fn failure(cause: impl std::fmt::Display) -> Self {
        Self {
            answer: format!("Error: {}", cause),
            sources: Vec::new(),
            error: true,
        }
    }
}
