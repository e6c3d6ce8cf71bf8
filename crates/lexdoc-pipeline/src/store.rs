//! Byte storage seam.
//!
//! The processor fetches document bytes through this trait so tests and
//! alternative backends (object storage, in-memory fixtures) can stand in
//! for the local filesystem.

use async_trait::async_trait;
use lexdoc_core::{LexdocError, Result};
use std::path::PathBuf;

/// Read-only access to stored document bytes.
#[async_trait]
pub trait ByteStore: Send + Sync {
    /// Fetch the full contents of the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LexdocError::NotFound`] when no object exists at `path`.
    async fn get_file_buffer(&self, path: &str) -> Result<Vec<u8>>;
}

/// Filesystem-backed store rooted at a directory.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store resolving paths relative to `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ByteStore for FsStore {
    async fn get_file_buffer(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LexdocError::NotFound(full.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
