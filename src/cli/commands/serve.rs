//! HTTP server for agent frameworks and other systems.
//!
//! Hosts the MCP endpoint (stateless, one JSON-RPC request per POST) next to
//! plain REST routes for the same queries.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::NewslineError;
use crate::mcp::McpServer;
use crate::news::{
    ArticleQuery, KeywordQuery, SourceCountQuery, VideoQuery, DEFAULT_LIMIT, DEFAULT_SEARCH_HOURS,
};
use crate::service::NewsService;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
struct AppState {
    service: NewsService,
    mcp: McpServer,
}

/// Run the HTTP server.
pub async fn run_serve(host: Option<&str>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let service = NewsService::from_settings(&settings)?;
    let app = router(service);

    let host = host.unwrap_or(&settings.server.host);
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Listening on {}", addr);
    Output::header("Newsline Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Snapshot", &settings.snapshot.url);
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Info", "GET  /info");
    Output::kv("MCP", "POST /mcp");
    Output::kv("Articles", "GET  /articles?categories=&hours=&limit=");
    Output::kv("Videos", "GET  /videos?channel=&hours=&limit=");
    Output::kv("Search", "GET  /search?q=&hours=&limit=");
    Output::kv("Sources", "GET  /sources?hours=");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
pub fn router(service: NewsService) -> Router {
    let state = Arc::new(AppState {
        mcp: McpServer::new(service.clone()),
        service,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(server_info))
        .route("/mcp", post(mcp))
        .route("/articles", get(articles))
        .route("/videos", get(videos))
        .route("/search", get(search))
        .route("/sources", get(sources))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ArticlesParams {
    /// Comma-separated category list.
    #[serde(default)]
    categories: Option<String>,
    #[serde(default)]
    hours: Option<u32>,
    #[serde(default)]
    limit: Option<usize>,
}

impl From<ArticlesParams> for ArticleQuery {
    fn from(params: ArticlesParams) -> Self {
        let defaults = ArticleQuery::default();
        ArticleQuery {
            categories: params
                .categories
                .map(|c| c.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
            hours: params.hours.unwrap_or(defaults.hours),
            limit: params.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
    #[serde(default)]
    hours: Option<u32>,
    #[serde(default)]
    limit: Option<usize>,
}

impl From<SearchParams> for KeywordQuery {
    fn from(params: SearchParams) -> Self {
        KeywordQuery {
            query: params.q,
            hours: params.hours.unwrap_or(DEFAULT_SEARCH_HOURS),
            limit: params.limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Library error rendered as an HTTP response.
struct ApiError(NewslineError);

impl From<NewslineError> for ApiError {
    fn from(e: NewslineError) -> Self {
        Self(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(NewslineError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            NewslineError::Fetch(_) | NewslineError::Schema(_) => StatusCode::BAD_GATEWAY,
            NewslineError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn server_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.server_info())
}

async fn mcp(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn articles(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ArticlesParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let articles = state.service.list_recent_articles(&params.into()).await?;
    Ok(Json(articles))
}

async fn videos(
    State(state): State<Arc<AppState>>,
    params: Result<Query<VideoQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let videos = state.service.list_recent_videos(&params).await?;
    Ok(Json(videos))
}

async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let articles = state.service.keyword_search(&params.into()).await?;
    Ok(Json(articles))
}

async fn sources(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SourceCountQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let counts = state.service.source_counts(&params).await?;
    Ok(Json(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FileSource;
    use crate::testing::{sample_snapshot, serve_router};
    use chrono::Utc;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    async fn start(snapshot: Option<Vec<u8>>) -> (String, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsletter.db");
        if let Some(body) = snapshot {
            std::fs::write(&path, body).unwrap();
        }
        let service = NewsService::new(Arc::new(FileSource::new(path)));
        let addr = serve_router(router(service)).await;
        (format!("http://{}", addr), dir)
    }

    async fn get_json(url: &str) -> (StatusCode, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_health_and_info() {
        let (base, _dir) = start(None).await;

        let (status, body) = get_json(&format!("{}/health", base)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        let (status, body) = get_json(&format!("{}/info", base)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["server_name"], json!("newsline"));
    }

    #[tokio::test]
    async fn test_rest_queries() {
        let (base, _dir) = start(Some(sample_snapshot(Utc::now()))).await;

        let (status, body) = get_json(&format!("{}/articles?categories=finance,bogus&hours=48", base)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = get_json(&format!("{}/videos?channel=TechTalks&hours=48&limit=1", base)).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], json!("Weekly Tech Roundup"));

        let (_, body) = get_json(&format!("{}/search?q=zzz-no-match", base)).await;
        assert_eq!(body, json!([]));

        let (_, body) = get_json(&format!("{}/sources", base)).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_error_is_bad_gateway() {
        let (base, _dir) = start(None).await;
        let (status, body) = get_json(&format!("{}/articles", base)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().starts_with("Snapshot fetch failed"));
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_bad_request() {
        let (base, _dir) = start(Some(sample_snapshot(Utc::now()))).await;

        for path in ["/articles?hours=-1", "/videos?limit=many", "/search", "/sources?hours=1.5"] {
            let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
            assert_eq!(response.status().as_u16(), 400, "{}", path);
            assert!(response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("application/json")));

            let body: Value = response.json().await.unwrap();
            assert!(
                body["error"].as_str().unwrap().starts_with("Invalid input"),
                "{}: {}",
                path,
                body
            );
        }
    }

    #[tokio::test]
    async fn test_mcp_endpoint() {
        let (base, _dir) = start(Some(sample_snapshot(Utc::now()))).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/mcp", base))
            .body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "tools/call",
                    "params": { "name": "greet", "arguments": { "name": "Ada" } }
                })
                .to_string(),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body["result"]["content"][0]["text"],
            json!("Hello, Ada! Welcome to the newsline MCP server!")
        );

        let response = client
            .post(format!("{}/mcp", base))
            .body(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 202);
    }
}
