//! Snapshot acquisition.
//!
//! A snapshot is a point-in-time copy of the published SQLite database. Every
//! query acquires its own snapshot: the bytes are fetched from a
//! [`SnapshotSource`], written to a private temp file, and opened as a
//! connection. Dropping the [`Snapshot`] closes the connection and removes
//! the file, whichever way the caller exits.

mod file;
mod http;

pub use file::FileSource;
pub use http::HttpSource;

use crate::config::{Settings, SnapshotSettings};
use crate::error::{NewslineError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::Connection;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// Somewhere a snapshot body can be read from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the full snapshot body.
    async fn fetch(&self) -> Result<Bytes>;

    /// Human-readable location, used in logs and server metadata.
    fn location(&self) -> String;
}

/// A queryable local copy of the snapshot.
pub struct Snapshot {
    // Field order matters: the connection must close before the file is removed.
    conn: Connection,
    file: NamedTempFile,
}

impl Snapshot {
    /// Materialize `body` in a uniquely named temp file and open it.
    #[instrument(skip(body), fields(bytes = body.len()))]
    pub fn from_bytes(body: &[u8], temp_dir: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("newsline-").suffix(".db");

        let mut file = match temp_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };

        file.write_all(body)?;
        file.flush()?;

        let conn = Connection::open(file.path()).map_err(|e| {
            NewslineError::Schema(format!("Snapshot is not a readable SQLite database: {}", e))
        })?;

        debug!("Materialized snapshot at {:?}", file.path());

        Ok(Self { conn, file })
    }

    /// Connection to the local copy.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Path of the backing temp file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Fetch a fresh snapshot from `source`.
///
/// The body is written out on the blocking pool.
#[instrument(skip_all, fields(source = %source.location()))]
pub async fn acquire_snapshot(
    source: &dyn SnapshotSource,
    temp_dir: Option<&Path>,
) -> Result<Snapshot> {
    let body = source.fetch().await?;
    info!("Fetched snapshot ({} bytes)", body.len());

    let temp_dir = temp_dir.map(Path::to_path_buf);
    tokio::task::spawn_blocking(move || Snapshot::from_bytes(&body, temp_dir.as_deref()))
        .await
        .map_err(|e| NewslineError::Internal(e.to_string()))?
}

/// Build the source named by the snapshot settings.
///
/// `http`/`https` URLs are fetched over the network, `file://` URLs and bare
/// paths are read from disk.
pub fn source_from_settings(settings: &SnapshotSettings) -> Result<Arc<dyn SnapshotSource>> {
    let location = settings.url.trim();
    if location.is_empty() {
        return Err(NewslineError::Config("Snapshot URL is empty".to_string()));
    }

    match url::Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" => {
                let source = HttpSource::new(url.as_str(), Duration::from_secs(settings.timeout_secs))?
                    .with_cache_ttl(Duration::from_secs(settings.cache_ttl_secs));
                Ok(Arc::new(source))
            }
            "file" => {
                let path = url.to_file_path().map_err(|_| {
                    NewslineError::Config(format!("Invalid file URL: {}", location))
                })?;
                Ok(Arc::new(FileSource::new(path)))
            }
            other => Err(NewslineError::Config(format!(
                "Unsupported snapshot scheme '{}' in {}",
                other, location
            ))),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(Arc::new(FileSource::new(Settings::expand_path(location))))
        }
        Err(e) => Err(NewslineError::Config(format!(
            "Invalid snapshot URL '{}': {}",
            location, e
        ))),
    }
}
