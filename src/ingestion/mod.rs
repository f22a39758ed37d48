//! Document ingestion: per-format extraction and chunking

pub mod chunker;
pub mod parser;

pub use chunker::TextChunker;
pub use parser::{ExtractedDocument, FileParser};

use std::path::{Path, PathBuf};

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkSource, FileFormat};

/// Converts a set of file paths into an ordered sequence of text chunks
pub struct DocumentLoader {
    chunker: TextChunker,
}

impl DocumentLoader {
    /// Create a loader with the configured window size and overlap
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunker: TextChunker::new(config.chunk_size, config.chunk_overlap),
        }
    }

    /// Process multiple documents into chunks
    ///
    /// Any failure aborts the whole batch; chunk order follows input file
    /// order, then position within each file. Inputs are only read, never
    /// moved or deleted.
    pub fn process(&self, paths: &[PathBuf]) -> Result<Vec<Chunk>> {
        let mut extracted = Vec::with_capacity(paths.len());
        for path in paths {
            extracted.push(self.extract(path)?);
        }

        let mut chunks = Vec::new();
        for doc in &extracted {
            for (index, window) in self.chunker.split(&doc.content).into_iter().enumerate() {
                let source = ChunkSource {
                    filename: doc.filename.clone(),
                    format: doc.format,
                    page: doc.page_count.filter(|&n| n == 1),
                    chunk_index: index as u32,
                };
                chunks.push(Chunk::new(window, source));
            }
        }

        tracing::debug!("Processed {} files into {} chunks", paths.len(), chunks.len());
        Ok(chunks)
    }

    /// Extract a single document, dispatching by extension
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        // Extension gates the read: nothing is touched for rejected types
        if FileFormat::from_name(&filename).is_none() {
            let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
            return Err(Error::UnsupportedType(format!(".{}", ext)));
        }

        let data = std::fs::read(path)
            .map_err(|e| Error::extraction(&filename, e.to_string()))?;

        FileParser::parse(&filename, &data)
    }
}
