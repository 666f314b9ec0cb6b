// src/highlights/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One normalized highlight/story from one feed. Immutable once produced
/// by the normalizer; carries no identity beyond its field values.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Label of the originating feed, e.g. "Products", "Affairs".
    pub category: String,
    pub title: String,
    pub summary: String,
    /// Raw upstream publication string, kept for display.
    pub published_at: String,
    /// Always a valid UTC timestamp; epoch-zero when the raw string is
    /// absent or unparsable, so ordering comparisons never fail.
    pub published_at_parsed: DateTime<Utc>,
    /// Primary popularity signal (upstream `feed_num`).
    pub heat: u64,
    /// Secondary popularity signal (upstream `article_num`).
    pub mention_count: u64,
    /// Empty when the story has no image; rankable, not an error.
    pub image_url: String,
    /// `"#"` when the story has no source link.
    pub link_url: String,
}

#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetch one raw JSON payload for this feed.
    async fn fetch_payload(&self) -> Result<serde_json::Value>;
    fn category(&self) -> &str;
}
