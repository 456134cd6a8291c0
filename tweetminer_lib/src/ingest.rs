//! One ingestion run: roster in, normalized records out.
//!
//! Drives the recency tier across the full roster and the archive tier
//! across the senator subset, normalizes every page entry, and hands the
//! concatenated records to the sink one at a time. Only a failed roster
//! read aborts the run; every other failure is contained at its own scope
//! and surfaced through the summary counters.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveTime, Utc};
use serde::Serialize;

use tweetminer_api::{normalize, ArchiveSearchQuery, Client, RecentSearchQuery};

use crate::db::{Db, DbError, Entity};
use crate::rate_limit::CooldownGate;
use crate::types::TweetRecord;

/// Office value selecting entities for the archive tier.
const ARCHIVE_OFFICE: &str = "senator";

/// The one run-aborting failure: the entity directory could not be read.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("entity directory unavailable: {0}")]
    Directory(#[from] DbError),
}

/// Cooperative stop signal.
///
/// Raising it stops new tier requests; the entry currently being
/// normalized and stored still completes, so no partial write is orphaned.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counters describing how complete a run was.
#[derive(Debug, Default, Clone, Serialize)]
pub struct IngestSummary {
    pub entities: usize,
    pub recency_tweets: usize,
    pub archive_tweets: usize,
    pub stored: usize,
    pub transport_failures: usize,
    pub dropped_entries: usize,
    pub sink_failures: usize,
}

/// Executes one full ingestion pass against the given tiers and sink.
pub async fn run(
    client: &Client,
    db: &Db,
    cancel: &CancelFlag,
) -> Result<IngestSummary, IngestError> {
    let entities = db.entities()?;
    tracing::info!("{} entities found", entities.len());

    let gate = CooldownGate::default();
    let mut summary = IngestSummary {
        entities: entities.len(),
        ..Default::default()
    };
    let mut records = Vec::new();

    let start_time = recency_start_time();
    recency_pass(
        client,
        &gate,
        &entities,
        &start_time,
        cancel,
        &mut records,
        &mut summary,
    )
    .await;
    summary.recency_tweets = records.len();
    tracing::info!("{} tweets found by the recency tier", summary.recency_tweets);

    let senators: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.office.eq_ignore_ascii_case(ARCHIVE_OFFICE))
        .collect();
    let to_date = archive_to_date();
    archive_pass(
        client,
        &gate,
        &senators,
        &to_date,
        cancel,
        &mut records,
        &mut summary,
    )
    .await;
    summary.archive_tweets = records.len() - summary.recency_tweets;
    tracing::info!("{} tweets found by the archive tier", summary.archive_tweets);

    for record in &records {
        match db.insert_tweet(record) {
            Ok(()) => summary.stored += 1,
            Err(e) => {
                tracing::error!("Failed to store tweet {}: {}", record.tweet_id, e);
                summary.sink_failures += 1;
            }
        }
    }

    tracing::info!("Run complete: {} tweets stored", summary.stored);
    Ok(summary)
}

/// One recency query per roster entity, in roster order.
async fn recency_pass(
    client: &Client,
    gate: &CooldownGate,
    entities: &[Entity],
    start_time: &str,
    cancel: &CancelFlag,
    records: &mut Vec<TweetRecord>,
    summary: &mut IngestSummary,
) {
    for entity in entities {
        if cancel.is_cancelled() {
            tracing::info!("Cancelled, skipping remaining recency queries");
            return;
        }
        gate.wait_ready().await;

        let query = RecentSearchQuery::new(&entity.handle, start_time);
        let fetched = match client.recent_tweets(&query).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!("Recency query for {} failed: {}", entity.handle, e);
                summary.transport_failures += 1;
                continue;
            }
        };
        gate.note_remaining(fetched.rate_remaining).await;

        // No data field means no posts in the window for this entity
        let Some(entries) = fetched.payload.data else {
            continue;
        };
        collect_entries(&entries, entity, records, summary);
    }
}

/// Cursor-paginated archive queries for the senator subset.
///
/// The absent cursor is the only terminator; an empty page with a cursor
/// still present keeps the loop going. A transport failure abandons the
/// rest of that entity's backlog and moves to the next entity.
async fn archive_pass(
    client: &Client,
    gate: &CooldownGate,
    entities: &[&Entity],
    to_date: &str,
    cancel: &CancelFlag,
    records: &mut Vec<TweetRecord>,
    summary: &mut IngestSummary,
) {
    for entity in entities {
        let mut cursor: Option<String> = None;
        loop {
            if cancel.is_cancelled() {
                tracing::info!("Cancelled, skipping remaining archive queries");
                return;
            }
            gate.wait_ready().await;

            let mut query = ArchiveSearchQuery::new(&entity.handle, to_date);
            if let Some(ref next) = cursor {
                query = query.with_next(next);
            }
            let fetched = match client.archive_search(&query).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::error!("Archive query for {} failed: {}", entity.handle, e);
                    summary.transport_failures += 1;
                    break;
                }
            };
            gate.note_remaining(fetched.rate_remaining).await;

            if let Some(entries) = fetched.payload.results {
                collect_entries(&entries, entity, records, summary);
            }

            match fetched.payload.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
    }
}

fn collect_entries(
    entries: &[serde_json::Value],
    entity: &Entity,
    records: &mut Vec<TweetRecord>,
    summary: &mut IngestSummary,
) {
    for entry in entries {
        match normalize(entry, entity.entity_id) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Dropping entry for {}: {}", entity.handle, e);
                summary.dropped_entries += 1;
            }
        }
    }
}

/// Prior UTC calendar day at midnight, second precision.
fn recency_start_time() -> String {
    let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN);
    let start = midnight - chrono::Duration::days(1);
    start.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Archive lookback boundary: seven days before now, `YYYYMMDDhhmm`.
fn archive_to_date() -> String {
    (Utc::now() - chrono::Duration::days(7))
        .format("%Y%m%d%H%M")
        .to_string()
}
