//! Conversion of tier-specific page entries into [`TweetRecord`]s.
//!
//! The two tiers speak different schemas: the recency tier nests its
//! engagement counters under `public_metrics`, while the archive tier
//! reports them at the top level and moves long bodies into
//! `extended_tweet.full_text` behind a `truncated` flag. Detection works
//! by decoding into an untagged enum, so an entry matching neither shape
//! is rejected whole instead of being half-read.

use serde::Deserialize;

use crate::types::{ArchiveTweet, RecentTweet, TweetRecord};

/// Failure to turn one raw page entry into a canonical record.
///
/// Always scoped to a single entry; sibling entries on the same page are
/// unaffected.
#[derive(thiserror::Error, Debug)]
pub enum NormalizeError {
    /// The entry matched neither the recency nor the archive schema.
    #[error("entry matches no known tier schema: {0}")]
    UnrecognizedShape(serde_json::Error),
    /// The entry carried an empty platform post id.
    #[error("entry has an empty post id")]
    EmptyTweetId,
    /// `truncated` was set but the extended payload was absent.
    #[error("truncated entry {id} is missing its extended payload")]
    MissingExtendedText { id: String },
    /// An engagement counter was negative.
    #[error("entry {id} has a negative {field} of {value}")]
    NegativeCount {
        id: String,
        field: &'static str,
        value: i64,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTweet {
    Recent(RecentTweet),
    Legacy(ArchiveTweet),
}

/// Normalizes one raw page entry into a [`TweetRecord`] owned by `entity_id`.
pub fn normalize(
    entry: &serde_json::Value,
    entity_id: i64,
) -> Result<TweetRecord, NormalizeError> {
    let raw = RawTweet::deserialize(entry).map_err(NormalizeError::UnrecognizedShape)?;
    let record = match raw {
        RawTweet::Recent(tweet) => TweetRecord {
            entity_id,
            tweet_id: tweet.id,
            text: strip_quotes(&tweet.text),
            created_at: tweet.created_at,
            retweet_count: tweet.public_metrics.retweet_count,
            reply_count: tweet.public_metrics.reply_count,
            like_count: tweet.public_metrics.like_count,
            quote_count: tweet.public_metrics.quote_count,
        },
        RawTweet::Legacy(tweet) => {
            // When the tier truncates, the real body lives in the nested
            // extended payload; the top-level `text` is the cut-off form.
            let text = if tweet.truncated {
                match tweet.extended_tweet {
                    Some(extended) => extended.full_text,
                    None => {
                        return Err(NormalizeError::MissingExtendedText { id: tweet.id_str })
                    }
                }
            } else {
                tweet.text
            };
            TweetRecord {
                entity_id,
                tweet_id: tweet.id_str,
                text: strip_quotes(&text),
                created_at: tweet.created_at,
                retweet_count: tweet.retweet_count,
                reply_count: tweet.reply_count,
                like_count: tweet.favorite_count,
                quote_count: tweet.quote_count,
            }
        }
    };

    if record.tweet_id.is_empty() {
        return Err(NormalizeError::EmptyTweetId);
    }
    check_counts(&record)?;
    Ok(record)
}

fn strip_quotes(text: &str) -> String {
    text.replace('\'', "")
}

fn check_counts(record: &TweetRecord) -> Result<(), NormalizeError> {
    for (field, value) in [
        ("retweet_count", record.retweet_count),
        ("reply_count", record.reply_count),
        ("like_count", record.like_count),
        ("quote_count", record.quote_count),
    ] {
        if value < 0 {
            return Err(NormalizeError::NegativeCount {
                id: record.tweet_id.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}
