//! The canonical post record produced by ingestion regardless of tier.

use serde::{Deserialize, Serialize};

/// One normalized social-media post, ready for the sink.
///
/// Built once by the normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetRecord {
    /// Directory id of the entity that authored the post.
    pub entity_id: i64,
    /// Platform-assigned post id. Never empty.
    pub tweet_id: String,
    /// Plain-text body, single quotes stripped.
    pub text: String,
    /// Creation timestamp as supplied by the source tier (ISO-8601 on the
    /// recency tier, free-text on the archive tier).
    pub created_at: String,
    pub retweet_count: i64,
    pub reply_count: i64,
    pub like_count: i64,
    pub quote_count: i64,
}
