//! Temporary staging of uploaded bytes
//!
//! Uploaded files are written into a per-request temp directory so the
//! loader can read them from disk. The directory and everything in it is
//! removed when the handle drops, which covers every exit path out of
//! the upload handler: success, validation rejection, and processing
//! failure.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::{Error, Result};

/// Uploaded files staged on disk for the lifetime of one request
pub struct StagedUploads {
    dir: TempDir,
    paths: Vec<PathBuf>,
}

impl StagedUploads {
    /// Create an empty staging area
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("docqa-upload-")
            .tempdir()
            .map_err(|e| Error::storage(format!("failed to create staging dir: {}", e)))?;
        Ok(Self {
            dir,
            paths: Vec::new(),
        })
    }

    /// Write one uploaded file, keeping its original name so extension
    /// dispatch still works downstream
    pub fn stage(&mut self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        // Strip any path components a hostile client sent along
        let name = Path::new(filename)
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let path = self.dir.path().join(format!("{}-{}", self.paths.len(), name));
        std::fs::write(&path, data)?;
        self.paths.push(path.clone());
        Ok(path)
    }

    /// Paths of everything staged so far, in upload order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}
