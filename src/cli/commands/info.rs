//! Info command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::service::NewsService;
use anyhow::Result;

/// Print server metadata.
pub fn run_info(settings: &Settings) -> Result<()> {
    let info = NewsService::from_settings(settings)?.server_info();

    Output::header("Newsline");
    Output::kv("Version", &info.version);
    Output::kv("Environment", &info.environment);
    Output::kv("Rust", &info.rust_version);
    Output::kv("Snapshot", &info.snapshot_source);
    Output::kv(
        "Config file",
        &Settings::default_config_path().display().to_string(),
    );

    Ok(())
}
