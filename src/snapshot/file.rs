//! Snapshot source backed by a local file.

use super::SnapshotSource;
use crate::error::{NewslineError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

/// Reads the snapshot from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self) -> Result<Bytes> {
        let body = tokio::fs::read(&self.path).await.map_err(|e| {
            NewslineError::Fetch(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        Ok(Bytes::from(body))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
