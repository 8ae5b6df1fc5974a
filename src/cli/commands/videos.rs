//! Videos command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::news::VideoQuery;
use crate::service::NewsService;
use anyhow::Result;

/// Run the videos command.
pub async fn run_videos(
    channel: Option<String>,
    hours: u32,
    limit: usize,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let service = NewsService::from_settings(&settings)?;
    let query = VideoQuery {
        hours,
        limit,
        channel,
    };

    let videos = match service.list_recent_videos(&query).await {
        Ok(videos) => videos,
        Err(e) => {
            Output::error(&format!("Failed to list videos: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&videos)?);
    } else if videos.is_empty() {
        Output::info(&format!("No videos in the last {} hours.", hours));
    } else {
        Output::header(&format!("Videos from the last {} hours ({})", hours, videos.len()));
        for video in &videos {
            Output::video(video);
        }
    }

    Ok(())
}
