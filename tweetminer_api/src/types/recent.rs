//! Response schema for the recency search tier.

use serde::{Deserialize, Serialize};

/// One page of recency-tier results.
///
/// The tier omits `data` entirely when the window holds no posts, so a
/// missing array is a normal zero-result response, not an error. Entries
/// are kept as raw JSON so one malformed entry cannot poison its page.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecentSearchResponse {
    pub data: Option<Vec<serde_json::Value>>,
    pub meta: Option<RecentSearchMeta>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentSearchMeta {
    pub result_count: i64,
    #[serde(default)]
    pub newest_id: Option<String>,
    #[serde(default)]
    pub oldest_id: Option<String>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// A single recency-tier entry: machine timestamp, engagement counters
/// nested under `public_metrics`.
#[derive(Debug, Deserialize)]
pub struct RecentTweet {
    pub id: String,
    pub text: String,
    pub created_at: String,
    #[serde(default)]
    pub author_id: Option<String>,
    pub public_metrics: PublicMetrics,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PublicMetrics {
    pub retweet_count: i64,
    pub reply_count: i64,
    pub like_count: i64,
    pub quote_count: i64,
}
