//! Error types for Newsline.

use thiserror::Error;

/// Library-level error type for Newsline operations.
#[derive(Error, Debug)]
pub enum NewslineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot fetch failed: {0}")]
    Fetch(String),

    #[error("Snapshot schema error: {0}")]
    Schema(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Newsline operations.
pub type Result<T> = std::result::Result<T, NewslineError>;
