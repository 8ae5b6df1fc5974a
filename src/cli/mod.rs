//! CLI module for Newsline.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Newsline - news snapshot tools for AI agents
///
/// Serves read-only article and video lookups over a published SQLite snapshot,
/// as MCP tools (stdio or HTTP) or straight from the command line.
#[derive(Parser, Debug)]
#[command(name = "newsline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Snapshot location (URL or path), overriding config and DB_URL
    #[arg(long, global = true)]
    pub db_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server on stdio for AI assistant integration
    Mcp,

    /// Start HTTP server (MCP endpoint plus REST routes)
    Serve {
        /// Host to bind to (default: server.host, or HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default: server.port, or PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List recent articles
    Articles {
        /// Category to include (repeatable; unknown values are ignored)
        #[arg(short = 'C', long = "category")]
        categories: Vec<String>,

        /// Lookback window in hours
        #[arg(long, default_value = "24")]
        hours: u32,

        /// Maximum number of results
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent videos
    Videos {
        /// Only this channel (exact match)
        #[arg(long)]
        channel: Option<String>,

        /// Lookback window in hours
        #[arg(long, default_value = "24")]
        hours: u32,

        /// Maximum number of results
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Search article titles and urls for a keyword
    Search {
        /// Keyword to look for
        query: String,

        /// Lookback window in hours
        #[arg(long, default_value = "48")]
        hours: u32,

        /// Maximum number of results
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Count recent articles per source
    Sources {
        /// Lookback window in hours
        #[arg(long, default_value = "24")]
        hours: u32,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show server metadata
    Info,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_articles() {
        let cli = Cli::parse_from([
            "newsline", "-v", "articles", "-C", "tech", "--category", "finance", "--hours", "6",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Articles { categories, hours, limit, json } => {
                assert_eq!(categories, vec!["tech", "finance"]);
                assert_eq!(hours, 6);
                assert_eq!(limit, 50);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_db_url() {
        let cli = Cli::parse_from(["newsline", "sources", "--db-url", "/tmp/news.db"]);
        assert_eq!(cli.db_url.as_deref(), Some("/tmp/news.db"));
    }

    #[test]
    fn test_negative_hours_rejected() {
        assert!(Cli::try_parse_from(["newsline", "videos", "--hours", "-3"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
