//! Request body builder for the extended (30-day archive) tier.

use serde::Serialize;

/// JSON body for one archive-tier page request.
///
/// `next` carries the cursor returned by the previous page and is omitted
/// entirely on the first request; the tier rejects an empty cursor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSearchQuery {
    query: String,
    max_results: String,
    to_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
}

impl ArchiveSearchQuery {
    /// Builds a first-page query for posts authored by `handle` up to
    /// `to_date` (`YYYYMMDDhhmm`, UTC).
    pub fn new(handle: &str, to_date: &str) -> Self {
        Self {
            query: format!("from:{}", handle),
            max_results: "100".to_string(),
            to_date: to_date.to_string(),
            next: None,
        }
    }

    /// Returns the same query continued from `cursor`.
    pub fn with_next(mut self, cursor: &str) -> Self {
        self.next = Some(cursor.to_string());
        self
    }
}
