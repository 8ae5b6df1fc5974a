//! Newsline - news snapshot tools for AI agents
//!
//! Serves read-only lookups over a published SQLite snapshot of news
//! articles and videos.
//!
//! # Overview
//!
//! Every query:
//! - fetches the snapshot (HTTP or local file)
//! - materializes it in a private temp file
//! - runs one bounded, time-windowed query
//! - drops the snapshot, deleting the temp file
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `snapshot` - Snapshot sources and scoped local copies
//! - `news` - Records, query parameters and SQL
//! - `service` - Query service combining the two
//! - `mcp` - MCP tool server (JSON-RPC over stdio or HTTP)
//! - `cli` - Command-line interface and HTTP host
//!
//! # Example
//!
//! ```rust,no_run
//! use newsline::config::Settings;
//! use newsline::news::ArticleQuery;
//! use newsline::service::NewsService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let service = NewsService::from_settings(&settings)?;
//!
//!     let query = ArticleQuery {
//!         categories: vec!["tech".to_string()],
//!         ..ArticleQuery::default()
//!     };
//!     for article in service.list_recent_articles(&query).await? {
//!         println!("{} ({})", article.title, article.source);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod news;
pub mod service;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{NewslineError, Result};
