//! Sources command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::news::SourceCountQuery;
use crate::service::NewsService;
use anyhow::Result;

/// Run the sources command.
pub async fn run_sources(hours: u32, json: bool, settings: Settings) -> Result<()> {
    let service = NewsService::from_settings(&settings)?;

    let counts = match service.source_counts(&SourceCountQuery { hours }).await {
        Ok(counts) => counts,
        Err(e) => {
            Output::error(&format!("Failed to count sources: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else if counts.is_empty() {
        Output::info(&format!("No articles in the last {} hours.", hours));
    } else {
        Output::header(&format!("Sources in the last {} hours", hours));
        println!();
        for count in &counts {
            Output::source_count(count);
        }

        let total: u64 = counts.iter().map(|c| c.count).sum();
        println!();
        Output::kv("Total articles", &total.to_string());
    }

    Ok(())
}
