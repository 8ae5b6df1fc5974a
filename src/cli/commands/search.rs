//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::news::KeywordQuery;
use crate::service::NewsService;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    hours: u32,
    limit: usize,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let service = NewsService::from_settings(&settings)?;
    let params = KeywordQuery {
        query: query.to_string(),
        hours,
        limit,
    };

    let articles = match service.keyword_search(&params).await {
        Ok(articles) => articles,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
    } else if articles.is_empty() {
        Output::info(&format!("No articles matching '{}'.", query));
    } else {
        Output::header(&format!("Found {} articles matching '{}'", articles.len(), query));
        for article in &articles {
            Output::article(article);
        }
    }

    Ok(())
}
