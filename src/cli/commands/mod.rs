//! CLI command implementations.

mod articles;
mod config;
mod info;
mod mcp;
mod search;
mod serve;
mod sources;
mod videos;

pub use articles::run_articles;
pub use config::run_config;
pub use info::run_info;
pub use mcp::run_mcp;
pub use search::run_search;
pub use serve::run_serve;
pub use sources::run_sources;
pub use videos::run_videos;
