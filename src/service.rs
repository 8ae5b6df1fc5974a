//! Query service: one fresh snapshot per operation.

use crate::config::Settings;
use crate::error::{NewslineError, Result};
use crate::news::{
    query, Article, ArticleQuery, KeywordQuery, SourceCount, SourceCountQuery, Video, VideoQuery,
};
use crate::snapshot::{acquire_snapshot, source_from_settings, SnapshotSource};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

pub const SERVER_NAME: &str = "newsline";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Minimum supported Rust toolchain the server was built for.
pub const RUST_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");

/// Static description of the running server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerMetadata {
    pub server_name: String,
    pub version: String,
    pub environment: String,
    pub rust_version: String,
    pub snapshot_source: String,
}

/// Read-only news queries over freshly fetched snapshots.
///
/// Cheap to clone; clones share the snapshot source.
#[derive(Clone)]
pub struct NewsService {
    source: Arc<dyn SnapshotSource>,
    temp_dir: Option<PathBuf>,
    environment: String,
}

impl NewsService {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            temp_dir: None,
            environment: "development".to_string(),
        }
    }

    /// Build the service described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let source = source_from_settings(&settings.snapshot)?;
        Ok(Self {
            source,
            temp_dir: settings.temp_dir(),
            environment: settings.server.environment.clone(),
        })
    }

    /// Materialize snapshots under `dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Acquire a fresh snapshot and run `f` against it on the blocking pool.
    ///
    /// The snapshot is dropped, and its temp file removed, inside the blocking task.
    async fn with_snapshot<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection, DateTime<Utc>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let snapshot = acquire_snapshot(self.source.as_ref(), self.temp_dir.as_deref()).await?;
        tokio::task::spawn_blocking(move || f(snapshot.connection(), Utc::now()))
            .await
            .map_err(|e| NewslineError::Internal(e.to_string()))?
    }

    pub async fn list_recent_articles(&self, params: &ArticleQuery) -> Result<Vec<Article>> {
        let params = params.clone();
        self.with_snapshot(move |conn, now| query::recent_articles(conn, &params, now))
            .await
    }

    pub async fn list_recent_videos(&self, params: &VideoQuery) -> Result<Vec<Video>> {
        let params = params.clone();
        self.with_snapshot(move |conn, now| query::recent_videos(conn, &params, now))
            .await
    }

    pub async fn keyword_search(&self, params: &KeywordQuery) -> Result<Vec<Article>> {
        let params = params.clone();
        self.with_snapshot(move |conn, now| query::keyword_search(conn, &params, now))
            .await
    }

    pub async fn source_counts(&self, params: &SourceCountQuery) -> Result<Vec<SourceCount>> {
        let params = params.clone();
        self.with_snapshot(move |conn, now| query::source_counts(conn, &params, now))
            .await
    }

    pub fn greet(&self, name: &str) -> String {
        format!("Hello, {}! Welcome to the {} MCP server!", name, SERVER_NAME)
    }

    pub fn server_info(&self) -> ServerMetadata {
        ServerMetadata {
            server_name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            environment: self.environment.clone(),
            rust_version: RUST_VERSION.to_string(),
            snapshot_source: self.source.location(),
        }
    }
}
