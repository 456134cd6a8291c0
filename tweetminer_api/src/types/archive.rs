//! Response schema for the extended (30-day archive) tier.
//!
//! This is the legacy premium-search shape: string ids live in `id_str`,
//! like counts in `favorite_count`, and bodies over the classic length
//! limit arrive truncated with the full text nested under
//! `extended_tweet.full_text`.

use serde::{Deserialize, Serialize};

/// One page of archive-tier results plus the cursor for the next page.
///
/// `next` absent means the backlog is exhausted; an empty `results` with a
/// cursor still present means "keep paginating". Entries stay raw JSON so
/// a bad entry drops alone.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArchiveSearchResponse {
    pub results: Option<Vec<serde_json::Value>>,
    pub next: Option<String>,
}

/// A single archive-tier entry.
#[derive(Debug, Deserialize)]
pub struct ArchiveTweet {
    pub id_str: String,
    pub text: String,
    #[serde(default)]
    pub truncated: bool,
    pub created_at: String,
    pub retweet_count: i64,
    pub reply_count: i64,
    pub favorite_count: i64,
    pub quote_count: i64,
    #[serde(default)]
    pub extended_tweet: Option<ExtendedTweet>,
}

#[derive(Debug, Deserialize)]
pub struct ExtendedTweet {
    pub full_text: String,
}
