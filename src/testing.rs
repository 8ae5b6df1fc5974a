//! Fixture snapshots for unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::{params, Connection};
use std::net::SocketAddr;

pub(crate) struct ArticleRow {
    pub title: &'static str,
    pub url: &'static str,
    pub source: &'static str,
    pub category: Option<&'static str>,
    pub published_at: String,
}

pub(crate) struct VideoRow {
    pub title: &'static str,
    pub url: &'static str,
    pub channel: &'static str,
    pub published_at: String,
}

/// Reference instant used by the query tests.
pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// SQLite-style timestamp `hours` before `now`.
pub(crate) fn hours_ago(now: DateTime<Utc>, hours: i64) -> String {
    (now - Duration::hours(hours))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub(crate) fn article(
    title: &'static str,
    url: &'static str,
    source: &'static str,
    category: Option<&'static str>,
    published_at: String,
) -> ArticleRow {
    ArticleRow {
        title,
        url,
        source,
        category,
        published_at,
    }
}

pub(crate) fn video(
    title: &'static str,
    url: &'static str,
    channel: &'static str,
    published_at: String,
) -> VideoRow {
    VideoRow {
        title,
        url,
        channel,
        published_at,
    }
}

/// Articles and videos relative to `now`, mixing timestamp notations.
pub(crate) fn sample_rows(now: DateTime<Utc>) -> (Vec<ArticleRow>, Vec<VideoRow>) {
    let iso = |hours: i64| {
        (now - Duration::hours(hours))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string()
    };
    let offset = |hours: i64| {
        (now - Duration::hours(hours) + Duration::hours(2))
            .format("%Y-%m-%dT%H:%M:%S+02:00")
            .to_string()
    };

    let articles = vec![
        article("AI Act passes", "https://news.example.com/ai-act", "Politico", Some("politics"), hours_ago(now, 2)),
        article("Startup raises $10M", "https://news.example.com/startup-10m", "TechCrunch", Some("startups"), hours_ago(now, 50)),
        article("Chip stocks rally", "https://news.example.com/chips", "Bloomberg", Some("finance"), iso(5)),
        article("New phone launched", "https://news.example.com/phone", "TechCrunch", Some("tech"), hours_ago(now, 1)),
        article("Merger talks stall", "https://news.example.com/merger", "Bloomberg", Some("business"), hours_ago(now, 30)),
        article("Fintech startup IPO", "https://news.example.com/fintech-ipo", "TechCrunch", Some("finance"), offset(40)),
    ];

    let videos = vec![
        video("Weekly Tech Roundup", "https://video.example.com/roundup", "TechTalks", hours_ago(now, 3)),
        video("Market Open", "https://video.example.com/market-open", "MarketWatch", hours_ago(now, 10)),
        video("Deep Dive: Chips", "https://video.example.com/chips", "TechTalks", hours_ago(now, 30)),
        video("Quick clip", "https://video.example.com/clip", "techtalks", hours_ago(now, 1)),
    ];

    (articles, videos)
}

/// Write the rows into a fresh SQLite database and return its bytes.
pub(crate) fn snapshot_bytes(articles: &[ArticleRow], videos: &[VideoRow]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE articles (
                title TEXT NOT NULL,
                url TEXT NOT NULL UNIQUE,
                source_name TEXT NOT NULL,
                category TEXT,
                published_at TEXT NOT NULL
            );

            CREATE TABLE videos (
                title TEXT NOT NULL,
                url TEXT NOT NULL UNIQUE,
                channel_name TEXT NOT NULL,
                published_at TEXT NOT NULL
            );
            "#,
        )
        .unwrap();

        for a in articles {
            conn.execute(
                "INSERT INTO articles (title, url, source_name, category, published_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![a.title, a.url, a.source, a.category, a.published_at],
            )
            .unwrap();
        }

        for v in videos {
            conn.execute(
                "INSERT INTO videos (title, url, channel_name, published_at) VALUES (?1, ?2, ?3, ?4)",
                params![v.title, v.url, v.channel, v.published_at],
            )
            .unwrap();
        }
    }

    std::fs::read(&path).unwrap()
}

/// The sample dataset as snapshot bytes.
pub(crate) fn sample_snapshot(now: DateTime<Utc>) -> Vec<u8> {
    let (articles, videos) = sample_rows(now);
    snapshot_bytes(&articles, &videos)
}

/// Serve `router` on an ephemeral local port.
pub(crate) async fn serve_router(router: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}
