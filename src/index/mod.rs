//! Embedded persistent vector index
//!
//! One collection is one serde-serialized file under the configured
//! persist directory. Entries are (id, text, vector, provenance) tuples;
//! search is brute-force cosine over the loaded collection. Writes go
//! through a temp file and rename so a crash never leaves a torn file.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::ChunkSource;

/// One stored (text, vector, metadata) triple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Opaque identifier
    pub id: Uuid,
    /// Chunk text
    pub text: String,
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Provenance metadata
    pub source: ChunkSource,
}

/// A nearest-neighbor match
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Matched chunk text
    pub text: String,
    /// Provenance metadata
    pub source: ChunkSource,
    /// Cosine similarity to the query
    pub score: f32,
}

#[derive(Serialize, Deserialize)]
struct CollectionFile {
    collection: String,
    /// Dimensionality shared by every entry; fixed by the first upsert
    dimensions: Option<usize>,
    entries: Vec<IndexEntry>,
}

/// A named, persistent collection of embedded chunks
pub struct VectorIndex {
    path: PathBuf,
    collection: String,
    dimensions: Option<usize>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    fn collection_path(dir: &Path, collection: &str) -> PathBuf {
        dir.join(format!("{}.json", collection))
    }

    /// Open a previously persisted collection; `None` when nothing exists
    pub fn open(dir: &Path, collection: &str) -> Result<Option<Self>> {
        let path = Self::collection_path(dir, collection);
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| Error::storage(format!("failed to read collection: {}", e)))?;
        let file: CollectionFile = serde_json::from_str(&raw)
            .map_err(|e| Error::storage(format!("corrupt collection file: {}", e)))?;

        tracing::info!(
            "Opened collection '{}' with {} entries",
            collection,
            file.entries.len()
        );

        Ok(Some(Self {
            path,
            collection: file.collection,
            dimensions: file.dimensions,
            entries: file.entries,
        }))
    }

    /// Create an empty collection (persisted on first upsert)
    pub fn create(dir: &Path, collection: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::storage(format!("failed to create index dir: {}", e)))?;

        Ok(Self {
            path: Self::collection_path(dir, collection),
            collection: collection.to_string(),
            dimensions: None,
            entries: Vec::new(),
        })
    }

    /// Open the persisted collection or create a fresh one
    pub fn open_or_create(dir: &Path, collection: &str) -> Result<Self> {
        match Self::open(dir, collection)? {
            Some(index) => Ok(index),
            None => Self::create(dir, collection),
        }
    }

    /// Append entries and persist
    ///
    /// Append semantics: re-upserting identical content stores duplicate
    /// entries. All vectors must share the collection's dimensionality.
    pub fn upsert(&mut self, entries: Vec<IndexEntry>) -> Result<usize> {
        let added = entries.len();

        for entry in &entries {
            if entry.vector.is_empty() {
                return Err(Error::storage("entry has an empty vector"));
            }
            match self.dimensions {
                None => self.dimensions = Some(entry.vector.len()),
                Some(dims) if dims != entry.vector.len() => {
                    return Err(Error::storage(format!(
                        "vector dimensionality mismatch: collection is {}, entry is {}",
                        dims,
                        entry.vector.len()
                    )));
                }
                Some(_) => {}
            }
        }

        self.entries.extend(entries);
        self.persist()?;
        Ok(added)
    }

    /// Top-K nearest entries by cosine similarity, best first
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                text: entry.text.clone(),
                source: entry.source.clone(),
                score: cosine_similarity(query, &entry.vector),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        hits
    }

    /// Current total entry count
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Collection name
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Delete the collection file, consuming the handle
    pub fn delete(self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| Error::storage(format!("failed to delete collection: {}", e)))?;
        }
        tracing::info!("Deleted collection '{}'", self.collection);
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::storage("collection path has no parent"))?;

        let file = CollectionFile {
            collection: self.collection.clone(),
            dimensions: self.dimensions,
            entries: self.entries.clone(),
        };
        let raw = serde_json::to_vec(&file)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| Error::storage(format!("failed to stage collection write: {}", e)))?;
        tmp.write_all(&raw)
            .map_err(|e| Error::storage(format!("failed to write collection: {}", e)))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::storage(format!("failed to persist collection: {}", e)))?;

        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileFormat;

    fn entry(text: &str, vector: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: Uuid::new_v4(),
            text: text.to_string(),
            vector,
            source: ChunkSource {
                filename: "test.txt".to_string(),
                format: FileFormat::Text,
                page: None,
                chunk_index: 0,
            },
        }
    }

    #[test]
    fn open_on_fresh_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VectorIndex::open(dir.path(), "missing").unwrap().is_none());
    }

    #[test]
    fn upsert_appends_and_search_ranks_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = VectorIndex::create(dir.path(), "docs").unwrap();

        index
            .upsert(vec![
                entry("about cats", vec![1.0, 0.0, 0.0]),
                entry("about dogs", vec![0.0, 1.0, 0.0]),
                entry("about cats too", vec![0.9, 0.1, 0.0]),
            ])
            .unwrap();

        let hits = index.search(&[1.0, 0.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "about cats");
        assert_eq!(hits[1].text, "about cats too");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn duplicate_upserts_append_rather_than_replace() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = VectorIndex::create(dir.path(), "docs").unwrap();

        index.upsert(vec![entry("same", vec![1.0, 0.0])]).unwrap();
        index.upsert(vec![entry("same", vec![1.0, 0.0])]).unwrap();
        assert_eq!(index.count(), 2);
    }

    #[test]
    fn dimension_mismatch_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = VectorIndex::create(dir.path(), "docs").unwrap();

        index.upsert(vec![entry("a", vec![1.0, 0.0, 0.0])]).unwrap();
        let err = index.upsert(vec![entry("b", vec![1.0, 0.0])]).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn collection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut index = VectorIndex::create(dir.path(), "docs").unwrap();
            index.upsert(vec![entry("persisted", vec![0.5, 0.5])]).unwrap();
        }

        let reopened = VectorIndex::open(dir.path(), "docs").unwrap().unwrap();
        assert_eq!(reopened.count(), 1);
        let hits = reopened.search(&[0.5, 0.5], 1);
        assert_eq!(hits[0].text, "persisted");
    }

    #[test]
    fn delete_removes_the_collection_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = VectorIndex::create(dir.path(), "docs").unwrap();
        index.upsert(vec![entry("gone soon", vec![1.0])]).unwrap();

        let path = dir.path().join("docs.json");
        assert!(path.exists());
        index.delete().unwrap();
        assert!(!path.exists());
        assert!(VectorIndex::open(dir.path(), "docs").unwrap().is_none());
    }

    #[test]
    fn cosine_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
