//! Configuration settings for Newsline.

use crate::error::{NewslineError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Published location of the newsletter snapshot.
pub const DEFAULT_SNAPSHOT_URL: &str =
    "https://raw.githubusercontent.com/chitadi/news-agent-poke-mcp/data/newsletter.db";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub snapshot: SnapshotSettings,
    pub server: ServerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Directory for snapshot temp files. Defaults to the system temp dir.
    pub temp_dir: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            temp_dir: None,
        }
    }
}

/// Where and how the snapshot is fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    /// HTTP(S) URL, `file://` URL, or local path of the SQLite snapshot.
    pub url: String,
    /// Timeout for a single fetch, in seconds.
    pub timeout_secs: u64,
    /// Reuse a fetched body for this many seconds. 0 disables caching.
    pub cache_ttl_secs: u64,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SNAPSHOT_URL.to_string(),
            timeout_secs: 20,
            cache_ttl_secs: 0,
        }
    }
}

/// HTTP host settings for `newsline serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Deployment label reported by `get_server_info`.
    pub environment: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            environment: "development".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides (`DB_URL`, `HOST`, `PORT`, `ENVIRONMENT`) are
    /// applied on top of the file contents.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply environment-style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DB_URL").filter(|v| !v.trim().is_empty()) {
            self.snapshot.url = url;
        }
        if let Some(host) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| NewslineError::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }
        if let Some(env) = lookup("ENVIRONMENT").filter(|v| !v.trim().is_empty()) {
            self.server.environment = env;
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| NewslineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newsline")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path, if one is configured.
    pub fn temp_dir(&self) -> Option<PathBuf> {
        self.general
            .temp_dir
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(Self::expand_path)
    }
}
