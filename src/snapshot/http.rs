//! Snapshot source fetched over HTTP.

use super::SnapshotSource;
use crate::error::{NewslineError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Downloads the snapshot with a single GET per fetch.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    cache: Option<BodyCache>,
}

impl HttpSource {
    /// Create a source for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("newsline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NewslineError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            cache: None,
        })
    }

    /// Reuse successful bodies for `ttl`. A zero TTL disables caching.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = (!ttl.is_zero()).then(|| BodyCache::new(ttl));
        self
    }

    /// GET `url` and return the body.
    ///
    /// Transport failures, timeouts and non-2xx statuses all surface as
    /// [`NewslineError::Fetch`]. Nothing is retried.
    #[instrument(skip(self))]
    pub async fn fetch_url(&self, url: &str) -> Result<Bytes> {
        if let Some(body) = self.cache.as_ref().and_then(|c| c.get(url)) {
            debug!("Using cached snapshot body");
            return Ok(body);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NewslineError::Fetch(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Snapshot download returned {}", status);
            return Err(NewslineError::Fetch(format!("GET {} returned HTTP {}", url, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NewslineError::Fetch(format!("Reading body of {} failed: {}", url, e)))?;

        if let Some(cache) = &self.cache {
            cache.put(url, body.clone());
        }

        Ok(body)
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Bytes> {
        self.fetch_url(&self.url).await
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Last successful body per URL, valid for a fixed window.
struct BodyCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Bytes)>>,
}

impl BodyCache {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, url: &str) -> Option<Bytes> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(url)
            .filter(|(fetched_at, _)| fetched_at.elapsed() < self.ttl)
            .map(|(_, body)| body.clone())
    }

    fn put(&self, url: &str, body: Bytes) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(url.to_string(), (Instant::now(), body));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::acquire_snapshot;
    use crate::testing::{fixed_now, sample_snapshot, serve_router};
    use axum::{extract::State, http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct Upstream {
        body: Bytes,
        hits: Arc<AtomicUsize>,
        fail_first: usize,
    }

    async fn newsletter(State(up): State<Upstream>) -> (StatusCode, Bytes) {
        let hit = up.hits.fetch_add(1, Ordering::SeqCst);
        if hit < up.fail_first {
            (StatusCode::INTERNAL_SERVER_ERROR, Bytes::new())
        } else {
            (StatusCode::OK, up.body.clone())
        }
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(2)).await;
        "too late"
    }

    async fn start(fail_first: usize) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let upstream = Upstream {
            body: Bytes::from(sample_snapshot(fixed_now())),
            hits: hits.clone(),
            fail_first,
        };
        let router = Router::new()
            .route("/newsletter.db", get(newsletter))
            .route("/slow.db", get(slow))
            .with_state(upstream);
        let addr = serve_router(router).await;
        (format!("http://{}", addr), hits)
    }

    #[tokio::test]
    async fn test_fetch_and_open() {
        let (base, _) = start(0).await;
        let source =
            HttpSource::new(format!("{}/newsletter.db", base), Duration::from_secs(5)).unwrap();

        let snapshot = acquire_snapshot(&source, None).await.unwrap();
        let count: i64 = snapshot
            .connection()
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 6);
    }

    #[tokio::test]
    async fn test_not_found_then_independent_success() {
        let (base, _) = start(0).await;
        let source = HttpSource::new(format!("{}/newsletter.db", base), Duration::from_secs(5)).unwrap();

        let err = source
            .fetch_url(&format!("{}/missing.db", base))
            .await
            .unwrap_err();
        assert!(matches!(err, NewslineError::Fetch(_)));
        assert!(err.to_string().contains("404"));

        assert!(source.fetch().await.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_is_not_cached() {
        let (base, hits) = start(1).await;
        let source = HttpSource::new(format!("{}/newsletter.db", base), Duration::from_secs(5))
            .unwrap()
            .with_cache_ttl(Duration::from_secs(60));

        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("500"));

        source.fetch().await.unwrap();
        source.fetch().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_without_cache_every_fetch_hits_upstream() {
        let (base, hits) = start(0).await;
        let source = HttpSource::new(format!("{}/newsletter.db", base), Duration::from_secs(5))
            .unwrap()
            .with_cache_ttl(Duration::ZERO);

        source.fetch().await.unwrap();
        source.fetch().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_expires() {
        let (base, hits) = start(0).await;
        let source = HttpSource::new(format!("{}/newsletter.db", base), Duration::from_secs(5))
            .unwrap()
            .with_cache_ttl(Duration::from_millis(200));

        source.fetch().await.unwrap();
        source.fetch().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(300)).await;
        source.fetch().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_error() {
        let (base, _) = start(0).await;
        let source = HttpSource::new(format!("{}/slow.db", base), Duration::from_millis(100)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, NewslineError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source =
            HttpSource::new(format!("http://{}/newsletter.db", addr), Duration::from_secs(2)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, NewslineError::Fetch(_)));
    }
}
