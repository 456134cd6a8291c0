//! Scheduler entry point: one ingestion run per invocation, no arguments.

use std::sync::Arc;

use anyhow::Result;

use tweetminer_lib::tweetminer_api::Client;
use tweetminer_lib::{ingest, CancelFlag, Config, Db};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tweetminer_api=info".parse().unwrap())
                .add_directive("tweetminer_lib=info".parse().unwrap())
                .add_directive("tweetminer_job=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting tweet miner");

    let config = Config::from_env()?;
    let db = Db::open(&config.db_path)?;
    db.init()?;

    let client = Client::new(
        &config.recent_endpoint,
        &config.archive_endpoint,
        &config.bearer_token,
    );

    let cancel = Arc::new(CancelFlag::new());
    let signal_flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Stop requested, finishing the current record");
            signal_flag.cancel();
        }
    });

    let summary = ingest::run(&client, &db, &cancel).await?;
    tracing::info!(
        "Tweet miner completed: {} stored ({} recency, {} archive), {} transport failures, {} dropped entries, {} sink failures",
        summary.stored,
        summary.recency_tweets,
        summary.archive_tweets,
        summary.transport_failures,
        summary.dropped_entries,
        summary.sink_failures
    );

    Ok(())
}
