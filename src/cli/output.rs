//! CLI output formatting utilities.

use crate::news::{Article, SourceCount, Video};
use console::style;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print an article.
    pub fn article(article: &Article) {
        let category = article
            .category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "\n{} {}",
            style(">>").green(),
            style(&article.title).bold()
        );
        println!(
            "   {} | {} | {}",
            article.source,
            style(category).cyan(),
            article.published_at.format("%Y-%m-%d %H:%M UTC")
        );
        println!("   {}", style(&article.url).dim());
    }

    /// Print a video.
    pub fn video(video: &Video) {
        println!("\n{} {}", style(">>").green(), style(&video.title).bold());
        println!(
            "   {} | {}",
            style(&video.channel).cyan(),
            video.published_at.format("%Y-%m-%d %H:%M UTC")
        );
        println!("   {}", style(&video.url).dim());
    }

    /// Print a per-source count.
    pub fn source_count(count: &SourceCount) {
        println!("  {:>5}  {}", style(count.count).bold(), count.source);
    }
}
