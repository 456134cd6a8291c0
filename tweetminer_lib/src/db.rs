//! SQLite storage: the tracked-entity directory and the tweet sink.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::types::TweetRecord;

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A tracked public official, as registered in the entity directory.
///
/// Read-only to the pipeline; the directory assigns ids and owns the
/// roster's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: i64,
    pub name: String,
    pub state: String,
    /// Social handle without the leading `@`.
    pub handle: String,
    pub office: String,
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for internal use by tests).
    #[doc(hidden)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn init(&self) -> Result<(), DbError> {
        // tweet_id is deliberately not unique: re-ingesting a window stores
        // duplicate rows until dedup gets a product decision.
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entities (
                entity_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                state TEXT NOT NULL,
                handle TEXT NOT NULL,
                office TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tweets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                entity_id INTEGER NOT NULL REFERENCES entities(entity_id),
                tweet_id TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL,
                retweet_count INTEGER NOT NULL,
                reply_count INTEGER NOT NULL,
                like_count INTEGER NOT NULL,
                quote_count INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tweets_entity ON tweets(entity_id);
            CREATE INDEX IF NOT EXISTS idx_tweets_tweet_id ON tweets(tweet_id);",
        )?;
        Ok(())
    }

    /// Reads the full tracked roster, ordered by directory-assigned id.
    ///
    /// Handles may be registered with or without a leading `@`; either way
    /// the returned [`Entity`] carries the bare handle.
    pub fn entities(&self) -> Result<Vec<Entity>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT entity_id, name, state, handle, office
             FROM entities
             ORDER BY entity_id",
        )?;
        let rows = stmt.query_map([], |row| {
            let handle: String = row.get(3)?;
            Ok(Entity {
                entity_id: row.get(0)?,
                name: row.get(1)?,
                state: row.get(2)?,
                handle: handle.trim_start_matches('@').to_string(),
                office: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Registers or replaces a tracked entity.
    pub fn upsert_entity(&self, entity: &Entity) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO entities (entity_id, name, state, handle, office)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(entity_id) DO UPDATE SET
               name = excluded.name,
               state = excluded.state,
               handle = excluded.handle,
               office = excluded.office",
            params![
                entity.entity_id,
                entity.name,
                entity.state,
                entity.handle,
                entity.office
            ],
        )?;
        Ok(())
    }

    /// Persists one normalized record.
    ///
    /// Parameterized throughout, so the body may hold any text the tiers
    /// produce, quotes and control characters included.
    pub fn insert_tweet(&self, record: &TweetRecord) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO tweets (
               entity_id, tweet_id, text, created_at,
               retweet_count, reply_count, like_count, quote_count
             )
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.entity_id,
                record.tweet_id,
                record.text,
                record.created_at,
                record.retweet_count,
                record.reply_count,
                record.like_count,
                record.quote_count
            ],
        )?;
        Ok(())
    }

    pub fn tweet_count(&self) -> Result<i64, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(1) FROM tweets", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: i64, handle: &str, office: &str) -> Entity {
        Entity {
            entity_id: id,
            name: format!("Entity {}", id),
            state: "OH".to_string(),
            handle: handle.to_string(),
            office: office.to_string(),
        }
    }

    fn record(entity_id: i64, tweet_id: &str, text: &str) -> TweetRecord {
        TweetRecord {
            entity_id,
            tweet_id: tweet_id.to_string(),
            text: text.to_string(),
            created_at: "2021-11-08T14:03:11.000Z".to_string(),
            retweet_count: 1,
            reply_count: 2,
            like_count: 3,
            quote_count: 0,
        }
    }

    fn open_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    #[test]
    fn roster_ordered_by_id() {
        let db = open_db();
        db.upsert_entity(&entity(3, "carol", "senator")).unwrap();
        db.upsert_entity(&entity(1, "alice", "senator")).unwrap();
        db.upsert_entity(&entity(2, "bob", "representative")).unwrap();

        let roster = db.entities().unwrap();
        let ids: Vec<i64> = roster.iter().map(|e| e.entity_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn roster_strips_leading_at_sign() {
        let db = open_db();
        db.upsert_entity(&entity(1, "@alice", "senator")).unwrap();

        let roster = db.entities().unwrap();
        assert_eq!(roster[0].handle, "alice");
    }

    #[test]
    fn duplicate_tweet_ids_are_stored_twice() {
        // Current behavior: no uniqueness on tweet_id, so re-ingesting a
        // window duplicates rows. Flagged for a future dedup decision.
        let db = open_db();
        db.upsert_entity(&entity(1, "alice", "senator")).unwrap();

        db.insert_tweet(&record(1, "100", "hello")).unwrap();
        db.insert_tweet(&record(1, "100", "hello")).unwrap();

        assert_eq!(db.tweet_count().unwrap(), 2);
    }

    #[test]
    fn hostile_text_is_stored_verbatim() {
        let db = open_db();
        db.upsert_entity(&entity(1, "alice", "senator")).unwrap();

        let text = "Robert'); DROP TABLE tweets;-- and a stray \" plus a\nnewline";
        db.insert_tweet(&record(1, "100", text)).unwrap();

        let stored: String = db
            .conn()
            .query_row("SELECT text FROM tweets WHERE tweet_id = '100'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(stored, text);
        assert_eq!(db.tweet_count().unwrap(), 1);
    }

    #[test]
    fn tweet_for_unknown_entity_is_rejected() {
        let db = open_db();
        assert!(db.insert_tweet(&record(42, "100", "orphan")).is_err());
    }

    #[test]
    fn upsert_entity_replaces_fields() {
        let db = open_db();
        db.upsert_entity(&entity(1, "alice", "representative")).unwrap();
        db.upsert_entity(&entity(1, "alice_new", "senator")).unwrap();

        let roster = db.entities().unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].handle, "alice_new");
        assert_eq!(roster[0].office, "senator");
    }
}
