//! Change-stream ingestion: decode, flatten, enrich, write.
//!
//! One invocation handles one stream batch. Records are processed
//! sequentially, malformed records are dropped with a diagnostic, and
//! each entity's surviving records are written in one pass. Removals
//! are filtered out; the analytical layer is append-only.

pub mod answer;
pub mod attribute;
pub mod call;
pub mod partition;
pub mod scorecard;
pub mod writer;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use attribute::AttributeValue;
use call::CallFlattener;
use scorecard::flatten_scorecard;
use writer::PartitionedWriter;

use crate::storage::{AnalyticsStore, Catalog, TranscriptStore};

/// One batch of change notifications, as delivered by the stream.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamBatch {
    #[serde(rename = "Records")]
    pub records: Vec<StreamRecord>,
}

/// One change notification.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "eventName")]
    pub operation: Operation,
    #[serde(rename = "eventSourceARN", default)]
    pub source_arn: String,
    #[serde(default)]
    pub dynamodb: StreamChange,
}

/// The changed row image carried by a notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamChange {
    #[serde(rename = "NewImage")]
    pub new_image: Option<HashMap<String, AttributeValue>>,
}

/// Stream operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Insert,
    Modify,
    Remove,
}

/// Logical source table of a change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEntity {
    Calls,
    Scorecards,
}

impl SourceEntity {
    /// Analytical table name, also the storage key prefix.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Calls => "calls",
            Self::Scorecards => "scorecards",
        }
    }

    /// Resolve from a stream source ARN by table-name substring.
    pub fn from_source_arn(arn: &str) -> Option<Self> {
        let arn = arn.to_lowercase();
        if arn.contains("calls") || arn.contains("callrecords") {
            Some(Self::Calls)
        } else if arn.contains("scorecards") {
            Some(Self::Scorecards)
        } else {
            None
        }
    }
}

/// Ingestion entry point: routes, flattens, and writes one batch.
pub struct IngestService {
    flattener: CallFlattener,
    writer: PartitionedWriter,
}

impl IngestService {
    pub fn new(
        transcripts: Arc<dyn TranscriptStore>,
        store: Arc<dyn AnalyticsStore>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            flattener: CallFlattener::new(transcripts),
            writer: PartitionedWriter::new(store, catalog),
        }
    }

    /// Process one stream batch end to end and return the number of
    /// records written. Malformed records are skipped; a write failure
    /// propagates to the caller, which owns the batch's redrive policy.
    pub async fn process_batch(&self, batch: &StreamBatch) -> crate::storage::Result<usize> {
        let mut calls = Vec::new();
        let mut scorecards = Vec::new();

        for record in &batch.records {
            // Deletions never reach the analytics layer
            if record.operation == Operation::Remove {
                continue;
            }
            let Some(image) = &record.dynamodb.new_image else {
                continue;
            };

            match SourceEntity::from_source_arn(&record.source_arn) {
                Some(SourceEntity::Calls) => {
                    if let Some(flat) = self.flattener.flatten(image).await {
                        calls.push(flat);
                    }
                }
                Some(SourceEntity::Scorecards) => {
                    if let Some(flat) = flatten_scorecard(image) {
                        scorecards.push(flat);
                    }
                }
                None => {
                    debug!(arn = %record.source_arn, "Unrecognized source entity, skipping");
                }
            }
        }

        let mut written = 0;
        written += self
            .writer
            .write(SourceEntity::Calls.table_name(), &calls)
            .await?;
        written += self
            .writer
            .write(SourceEntity::Scorecards.table_name(), &scorecards)
            .await?;

        info!(
            calls = calls.len(),
            scorecards = scorecards.len(),
            "Processed stream batch"
        );
        Ok(written)
    }
}
