//! MCP tool definitions for Newsline.

use super::protocol::Tool;
use crate::news::{Category, DEFAULT_HOURS, DEFAULT_LIMIT, DEFAULT_SEARCH_HOURS};
use serde_json::json;

pub const GREET: &str = "greet";
pub const GET_SERVER_INFO: &str = "get_server_info";
pub const LIST_RECENT_ARTICLES: &str = "list_recent_articles";
pub const LIST_RECENT_VIDEOS: &str = "list_recent_videos";
pub const KEYWORD_SEARCH: &str = "keyword_search";
pub const SOURCE_COUNTS: &str = "source_counts";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    let categories_help = format!(
        "Restrict to these categories, matched case-insensitively: {}. \
         Unrecognized values are ignored.",
        categories.join(", ")
    );

    vec![
        Tool {
            name: GREET.to_string(),
            description: "Greet a user by name with a welcome message from the server.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Name of the person to greet"
                    }
                },
                "required": ["name"]
            }),
        },
        Tool {
            name: GET_SERVER_INFO.to_string(),
            description: "Get information about the server: name, version, environment \
                and the snapshot it reads from."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        Tool {
            name: LIST_RECENT_ARTICLES.to_string(),
            description: "Return the most recent articles published in the last `hours`, \
                newest first. Unknown categories are ignored; no categories means all."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "categories": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": categories_help,
                        "default": []
                    },
                    "hours": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Lookback window in hours",
                        "default": DEFAULT_HOURS
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Maximum number of articles",
                        "default": DEFAULT_LIMIT
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: LIST_RECENT_VIDEOS.to_string(),
            description: "Return the most recent videos published in the last `hours`, \
                newest first, optionally from a single channel."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "hours": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Lookback window in hours",
                        "default": DEFAULT_HOURS
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Maximum number of videos",
                        "default": DEFAULT_LIMIT
                    },
                    "channel": {
                        "type": "string",
                        "description": "Exact (case-sensitive) channel name"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: KEYWORD_SEARCH.to_string(),
            description: "Keyword search over article titles and urls within the last `hours`. \
                Matching is a case-insensitive substring match."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Keyword, e.g. 'startup' or 'fintech'"
                    },
                    "hours": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Lookback window in hours",
                        "default": DEFAULT_SEARCH_HOURS
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Maximum number of articles",
                        "default": DEFAULT_LIMIT
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: SOURCE_COUNTS.to_string(),
            description: "Count of articles per source in the last `hours`, busiest first."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "hours": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Lookback window in hours",
                        "default": DEFAULT_HOURS
                    }
                },
                "required": []
            }),
        },
    ]
}
