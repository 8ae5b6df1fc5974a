//! News records and query parameters.
//!
//! Records are read from the `articles` and `videos` tables of a snapshot.
//! Query parameters double as tool arguments, so their serde defaults are
//! the defaults callers see.

pub mod query;

use crate::error::NewslineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default lookback for listings and source counts, in hours.
pub const DEFAULT_HOURS: u32 = 24;
/// Default lookback for keyword search, in hours.
pub const DEFAULT_SEARCH_HOURS: u32 = 48;
/// Default result cap.
pub const DEFAULT_LIMIT: usize = 50;

/// Fixed article classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tech,
    Startups,
    Business,
    Politics,
    Finance,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Tech,
        Category::Startups,
        Category::Business,
        Category::Politics,
        Category::Finance,
        Category::Miscellaneous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tech => "tech",
            Category::Startups => "startups",
            Category::Business => "business",
            Category::Politics => "politics",
            Category::Finance => "finance",
            Category::Miscellaneous => "miscellaneous",
        }
    }

    /// Keep the recognised categories from `values`, in order, without duplicates.
    ///
    /// Unknown values are dropped rather than rejected. An empty result means
    /// "no category restriction".
    pub fn validated<I, S>(values: I) -> Vec<Category>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut categories = Vec::new();
        for value in values {
            if let Ok(category) = value.as_ref().parse::<Category>() {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
        }
        categories
    }
}

impl FromStr for Category {
    type Err = NewslineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| NewslineError::Validation(format!("Unknown category: {}", s)))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub source: String,
    /// `None` when the snapshot has no category for the row, or an unknown one.
    pub category: Option<Category>,
    pub published_at: DateTime<Utc>,
}

/// A video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub url: String,
    pub channel: String,
    pub published_at: DateTime<Utc>,
}

/// Number of articles one source published in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
}

fn default_hours() -> u32 {
    DEFAULT_HOURS
}

fn default_search_hours() -> u32 {
    DEFAULT_SEARCH_HOURS
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Parameters for `list_recent_articles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleQuery {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_hours")]
    pub hours: u32,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Parameters for `list_recent_videos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoQuery {
    #[serde(default = "default_hours")]
    pub hours: u32,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub channel: Option<String>,
}

/// Parameters for `keyword_search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordQuery {
    pub query: String,
    #[serde(default = "default_search_hours")]
    pub hours: u32,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Parameters for `source_counts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCountQuery {
    #[serde(default = "default_hours")]
    pub hours: u32,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            hours: DEFAULT_HOURS,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Default for VideoQuery {
    fn default() -> Self {
        Self {
            hours: DEFAULT_HOURS,
            limit: DEFAULT_LIMIT,
            channel: None,
        }
    }
}

impl Default for SourceCountQuery {
    fn default() -> Self {
        Self {
            hours: DEFAULT_HOURS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_parse() {
        assert_eq!("tech".parse::<Category>().unwrap(), Category::Tech);
        assert_eq!(" Politics ".parse::<Category>().unwrap(), Category::Politics);
        assert!(matches!(
            "gossip".parse::<Category>(),
            Err(NewslineError::Validation(_))
        ));
    }

    #[test]
    fn test_validated_drops_unknown_and_duplicates() {
        let categories = Category::validated(["finance", "bogus", "FINANCE", "tech", ""]);
        assert_eq!(categories, vec![Category::Finance, Category::Tech]);

        assert!(Category::validated(["bogus", "news"]).is_empty());
        assert!(Category::validated(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Category::Startups).unwrap(), json!("startups"));
        assert_eq!(Category::Miscellaneous.to_string(), "miscellaneous");
    }

    #[test]
    fn test_query_defaults_from_empty_arguments() {
        let articles: ArticleQuery = serde_json::from_value(json!({})).unwrap();
        assert!(articles.categories.is_empty());
        assert_eq!(articles.hours, 24);
        assert_eq!(articles.limit, 50);

        let search: KeywordQuery = serde_json::from_value(json!({ "query": "ai" })).unwrap();
        assert_eq!(search.hours, 48);

        assert!(serde_json::from_value::<KeywordQuery>(json!({})).is_err());
        assert!(serde_json::from_value::<VideoQuery>(json!({ "hours": -1 })).is_err());
    }

    #[test]
    fn test_article_serializes_rfc3339() {
        let article = Article {
            title: "AI Act passes".to_string(),
            url: "https://news.example.com/ai-act".to_string(),
            source: "Politico".to_string(),
            category: Some(Category::Politics),
            published_at: crate::testing::fixed_now(),
        };

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["category"], json!("politics"));
        assert_eq!(value["published_at"], json!("2025-06-01T12:00:00Z"));
    }
}
