//! SQL queries against a snapshot connection.
//!
//! The lookback window is compared through `julianday()`, so any time string
//! SQLite understands (space or `T` separator, fractional seconds, `Z` or an
//! offset) is ordered by the instant it names. Rows whose timestamp SQLite
//! cannot parse never match a window.

use super::{
    Article, ArticleQuery, Category, KeywordQuery, SourceCount, SourceCountQuery, Video, VideoQuery,
};
use crate::error::{NewslineError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, Row};
use std::collections::HashSet;
use tracing::{debug, instrument};

const ARTICLES: &str = "articles";
const VIDEOS: &str = "videos";

/// Normalized UTC rendering of `published_at`.
const PUBLISHED_UTC: &str = "strftime('%Y-%m-%dT%H:%M:%SZ', published_at)";
const PUBLISHED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Earliest instant SQLite date functions accept.
const EARLIEST: &str = "0000-01-01 00:00:00";

/// Stored category, folded the same way [`Category`] parses it.
const CATEGORY_KEY: &str = "lower(trim(category, ' ' || char(9, 10, 11, 12, 13)))";

/// Most recent articles, optionally restricted to a set of categories.
#[instrument(skip(conn))]
pub fn recent_articles(
    conn: &Connection,
    query: &ArticleQuery,
    now: DateTime<Utc>,
) -> Result<Vec<Article>> {
    require_columns(
        conn,
        ARTICLES,
        &["title", "url", "source_name", "category", "published_at"],
    )?;

    let categories = Category::validated(&query.categories);

    let mut sql = format!(
        "SELECT title, url, source_name, category, {PUBLISHED_UTC} FROM articles \
         WHERE julianday(published_at) >= julianday(?1)"
    );
    let mut values = vec![Value::Text(window_start(now, query.hours))];

    if !categories.is_empty() {
        let placeholders: Vec<String> = (0..categories.len())
            .map(|i| format!("?{}", values.len() + i + 1))
            .collect();
        sql.push_str(&format!(" AND {CATEGORY_KEY} IN ({})", placeholders.join(", ")));
        values.extend(categories.iter().map(|c| Value::Text(c.as_str().to_string())));
    }

    sql.push_str(&format!(
        " ORDER BY julianday(published_at) DESC LIMIT ?{}",
        values.len() + 1
    ));
    values.push(Value::Integer(sql_limit(query.limit)));

    let mut stmt = conn.prepare(&sql)?;
    let articles = stmt
        .query_map(params_from_iter(values.iter()), article_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!("Found {} articles", articles.len());
    Ok(articles)
}

/// Most recent videos, optionally from one channel (exact, case-sensitive).
#[instrument(skip(conn))]
pub fn recent_videos(conn: &Connection, query: &VideoQuery, now: DateTime<Utc>) -> Result<Vec<Video>> {
    require_columns(conn, VIDEOS, &["title", "url", "channel_name", "published_at"])?;

    let mut sql = format!(
        "SELECT title, url, channel_name, {PUBLISHED_UTC} FROM videos \
         WHERE julianday(published_at) >= julianday(?1)"
    );
    let mut values = vec![Value::Text(window_start(now, query.hours))];

    if let Some(channel) = &query.channel {
        sql.push_str(" AND channel_name = ?2");
        values.push(Value::Text(channel.clone()));
    }

    sql.push_str(&format!(
        " ORDER BY julianday(published_at) DESC LIMIT ?{}",
        values.len() + 1
    ));
    values.push(Value::Integer(sql_limit(query.limit)));

    let mut stmt = conn.prepare(&sql)?;
    let videos = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(Video {
                title: text(row, 0)?,
                url: text(row, 1)?,
                channel: text(row, 2)?,
                published_at: published(row, 3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!("Found {} videos", videos.len());
    Ok(videos)
}

/// Articles whose title or url contains `query`, ignoring ASCII case.
///
/// The query is matched literally; `%` and `_` carry no wildcard meaning.
/// Snapshots without a `category` column are accepted and report no category.
#[instrument(skip(conn))]
pub fn keyword_search(
    conn: &Connection,
    query: &KeywordQuery,
    now: DateTime<Utc>,
) -> Result<Vec<Article>> {
    let columns = require_columns(conn, ARTICLES, &["title", "url", "source_name", "published_at"])?;
    let category = if columns.contains("category") {
        "category"
    } else {
        "NULL"
    };

    let mut sql = format!(
        "SELECT title, url, source_name, {category}, {PUBLISHED_UTC} FROM articles \
         WHERE julianday(published_at) >= julianday(?1)"
    );
    let mut values = vec![Value::Text(window_start(now, query.hours))];

    if !query.query.is_empty() {
        sql.push_str(" AND (instr(lower(title), lower(?2)) > 0 OR instr(lower(url), lower(?2)) > 0)");
        values.push(Value::Text(query.query.clone()));
    }

    sql.push_str(&format!(
        " ORDER BY julianday(published_at) DESC LIMIT ?{}",
        values.len() + 1
    ));
    values.push(Value::Integer(sql_limit(query.limit)));

    let mut stmt = conn.prepare(&sql)?;
    let articles = stmt
        .query_map(params_from_iter(values.iter()), article_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!("Keyword '{}' matched {} articles", query.query, articles.len());
    Ok(articles)
}

/// Article counts per source in the window, busiest source first.
#[instrument(skip(conn))]
pub fn source_counts(
    conn: &Connection,
    query: &SourceCountQuery,
    now: DateTime<Utc>,
) -> Result<Vec<SourceCount>> {
    require_columns(conn, ARTICLES, &["source_name", "published_at"])?;

    let mut stmt = conn.prepare(
        r#"
        SELECT source_name, COUNT(*) AS article_count
        FROM articles
        WHERE julianday(published_at) >= julianday(?1)
        GROUP BY source_name
        ORDER BY article_count DESC, source_name ASC
        "#,
    )?;

    let counts = stmt
        .query_map([window_start(now, query.hours)], |row| {
            let count: i64 = row.get(1)?;
            Ok(SourceCount {
                source: text(row, 0)?,
                count: u64::try_from(count).unwrap_or_default(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(counts)
}

/// Verify that `table` exists with `required` columns; returns every column it has.
pub fn require_columns(conn: &Connection, table: &str, required: &[&str]) -> Result<HashSet<String>> {
    let unreadable =
        |e: rusqlite::Error| NewslineError::Schema(format!("Snapshot is not a readable SQLite database: {}", e));

    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(unreadable)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(unreadable)?
        .collect::<rusqlite::Result<HashSet<_>>>()
        .map_err(unreadable)?;

    if columns.is_empty() {
        return Err(NewslineError::Schema(format!(
            "Snapshot has no `{}` table",
            table
        )));
    }

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !columns.contains(*c))
        .collect();
    if !missing.is_empty() {
        return Err(NewslineError::Schema(format!(
            "Table `{}` is missing columns: {}",
            table,
            missing.join(", ")
        )));
    }

    Ok(columns)
}

/// Lower bound of the lookback window, as a SQLite time string.
fn window_start(now: DateTime<Utc>, hours: u32) -> String {
    match now.checked_sub_signed(Duration::hours(i64::from(hours))) {
        Some(start) if start.year() >= 0 => start.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
        _ => EARLIEST.to_string(),
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    let category: Option<String> = row.get(3)?;
    Ok(Article {
        title: text(row, 0)?,
        url: text(row, 1)?,
        source: text(row, 2)?,
        category: category.and_then(|c| c.parse().ok()),
        published_at: published(row, 4)?,
    })
}

/// Text column, with NULL read as empty.
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn published(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, PUBLISHED_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
