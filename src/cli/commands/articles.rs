//! Articles command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::news::ArticleQuery;
use crate::service::NewsService;
use anyhow::Result;

/// Run the articles command.
pub async fn run_articles(
    categories: &[String],
    hours: u32,
    limit: usize,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let service = NewsService::from_settings(&settings)?;
    let query = ArticleQuery {
        categories: categories.to_vec(),
        hours,
        limit,
    };

    let articles = match service.list_recent_articles(&query).await {
        Ok(articles) => articles,
        Err(e) => {
            Output::error(&format!("Failed to list articles: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
    } else if articles.is_empty() {
        Output::info(&format!("No articles in the last {} hours.", hours));
    } else {
        Output::header(&format!("Articles from the last {} hours ({})", hours, articles.len()));
        for article in &articles {
            Output::article(article);
        }
    }

    Ok(())
}
