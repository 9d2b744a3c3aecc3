//! Backfill an existing source table into the analytics store.
//!
//! Usage:
//!   callscope-backfill <table-name>
//!
//! Buckets and catalog targets come from the usual configuration
//! sources (callscope.yaml or CALLSCOPE__ environment variables).

use std::sync::Arc;

use callscope::backfill::BackfillRunner;
use callscope::config::Config;
use callscope::storage::{GlueCatalog, S3AnalyticsStore, S3TranscriptStore};
use callscope::utils::bootstrap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    bootstrap::init_tracing();

    let table = std::env::args()
        .nth(1)
        .ok_or("usage: callscope-backfill <table-name>")?;

    let config = Config::load(None)?;
    if config.stores.analytics_bucket.is_empty() {
        return Err("stores.analytics_bucket must be configured".into());
    }
    if config.stores.transcript_bucket.is_empty() {
        return Err("stores.transcript_bucket must be configured".into());
    }

    let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let dynamo = aws_sdk_dynamodb::Client::new(&aws);

    let store = Arc::new(S3AnalyticsStore::new(&config.stores.analytics_bucket).await);
    let transcripts = Arc::new(
        S3TranscriptStore::new(
            &config.stores.transcript_bucket,
            &config.stores.transcript_prefix,
        )
        .await,
    );
    let catalog = Arc::new(GlueCatalog::new(&config.stores.catalog_database).await);

    let runner = BackfillRunner::new(dynamo, transcripts, store, catalog);
    let total = runner.run(&table).await?;
    println!("Backfill complete: {} records written", total);
    Ok(())
}
