//! Run configuration sourced from the environment.
//!
//! The pipeline is invoked by an external scheduler with no arguments, so
//! everything it needs arrives through environment variables (loaded from
//! `.env` by the job binary).

use std::env;
use std::path::PathBuf;

/// SQLite database path (entity directory + tweet sink).
pub const DB_VAR: &str = "TWEETMINER_DB";
/// Full URL of the recency-tier search endpoint.
pub const RECENT_ENDPOINT_VAR: &str = "TWEETMINER_RECENT_ENDPOINT";
/// Full URL of the archive-tier search endpoint.
pub const ARCHIVE_ENDPOINT_VAR: &str = "TWEETMINER_ARCHIVE_ENDPOINT";
/// Bearer token presented to both tiers.
pub const BEARER_TOKEN_VAR: &str = "TWEETMINER_BEARER_TOKEN";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
}

/// Everything the pipeline needs from its host environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub recent_endpoint: String,
    pub archive_endpoint: String,
    pub bearer_token: String,
}

impl Config {
    /// Reads the four required variables, failing on the first absent one.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            db_path: PathBuf::from(require(DB_VAR)?),
            recent_endpoint: require(RECENT_ENDPOINT_VAR)?,
            archive_endpoint: require(ARCHIVE_ENDPOINT_VAR)?,
            bearer_token: require(BEARER_TOKEN_VAR)?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
