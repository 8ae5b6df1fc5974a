//! Newsline CLI entry point.

use anyhow::Result;
use clap::Parser;
use newsline::cli::{commands, Cli, Commands};
use newsline::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };
    if let Some(url) = &cli.db_url {
        settings.snapshot.url = url.clone();
    }

    // Initialize logging. stdout belongs to the MCP transport, so logs go to stderr.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("newsline={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match &cli.command {
        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.as_deref(), *port, settings).await?;
        }

        Commands::Articles {
            categories,
            hours,
            limit,
            json,
        } => {
            commands::run_articles(categories, *hours, *limit, *json, settings).await?;
        }

        Commands::Videos {
            channel,
            hours,
            limit,
            json,
        } => {
            commands::run_videos(channel.clone(), *hours, *limit, *json, settings).await?;
        }

        Commands::Search {
            query,
            hours,
            limit,
            json,
        } => {
            commands::run_search(query, *hours, *limit, *json, settings).await?;
        }

        Commands::Sources { hours, json } => {
            commands::run_sources(*hours, *json, settings).await?;
        }

        Commands::Info => {
            commands::run_info(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, cli.config.as_deref(), settings)?;
        }
    }

    Ok(())
}
