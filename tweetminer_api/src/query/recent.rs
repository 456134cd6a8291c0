//! Query builder for the recency search tier.

use url::Url;

/// Entry fields requested on every recency query.
const TWEET_FIELDS: &str = "created_at,author_id,public_metrics";

/// Parameters for one recency-tier search: a single author, a lower time
/// bound, and a page-size cap.
pub struct RecentSearchQuery {
    handle: String,
    start_time: String,
    max_results: i64,
}

impl RecentSearchQuery {
    /// Builds a query for posts authored by `handle` (no leading `@`)
    /// since `start_time` (ISO-8601, second precision).
    pub fn new(handle: &str, start_time: &str) -> Self {
        Self {
            handle: handle.to_string(),
            start_time: start_time.to_string(),
            max_results: 100,
        }
    }

    /// Overrides the page-size cap (the tier accepts 10-100).
    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = max_results;
        self
    }

    /// Appends this query's parameters to the endpoint URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("query", &format!("from:{}", self.handle))
            .append_pair("max_results", &self.max_results.to_string())
            .append_pair("start_time", &self.start_time)
            .append_pair("tweet.fields", TWEET_FIELDS);
        url
    }
}
