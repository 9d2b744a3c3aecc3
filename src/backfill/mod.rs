//! One-shot table backfill into the analytics store.
//!
//! Scans the full source table and pushes every item through the same
//! flatteners and partitioned writer as stream ingestion. Run once
//! after enabling the change stream, so history written before the
//! stream existed shows up in the analytical layer.

use std::collections::HashMap;
use std::sync::Arc;

use aws_sdk_dynamodb::types::AttributeValue as SdkAttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::info;

use crate::ingest::attribute::AttributeValue;
use crate::ingest::call::CallFlattener;
use crate::ingest::scorecard::flatten_scorecard;
use crate::ingest::writer::PartitionedWriter;
use crate::ingest::SourceEntity;
use crate::storage::{AnalyticsStore, Catalog, Result, StorageError, TranscriptStore};

/// Scans a source table and writes its records to the analytics store.
pub struct BackfillRunner {
    client: Client,
    flattener: CallFlattener,
    writer: PartitionedWriter,
}

impl BackfillRunner {
    pub fn new(
        client: Client,
        transcripts: Arc<dyn TranscriptStore>,
        store: Arc<dyn AnalyticsStore>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            client,
            flattener: CallFlattener::new(transcripts),
            writer: PartitionedWriter::new(store, catalog),
        }
    }

    /// Scan `table_name` page by page, flattening and writing each page.
    /// Returns the total number of records written.
    pub async fn run(&self, table_name: &str) -> Result<usize> {
        let entity = SourceEntity::from_source_arn(table_name).ok_or_else(|| {
            StorageError::RetrieveFailed(format!(
                "cannot infer entity from table name: {}",
                table_name
            ))
        })?;
        info!(table = %table_name, entity = %entity.table_name(), "Starting backfill");

        let mut total = 0;
        let mut start_key: Option<HashMap<String, SdkAttributeValue>> = None;
        loop {
            let mut request = self.client.scan().table_name(table_name);
            if let Some(key) = start_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }
            let page = request.send().await.map_err(|e| {
                StorageError::RetrieveFailed(format!("table scan failed: {}", e))
            })?;

            total += match entity {
                SourceEntity::Calls => {
                    let mut records = Vec::new();
                    for item in page.items() {
                        let image = convert_image(item);
                        if let Some(flat) = self.flattener.flatten(&image).await {
                            records.push(flat);
                        }
                    }
                    self.writer.write(entity.table_name(), &records).await?
                }
                SourceEntity::Scorecards => {
                    let records: Vec<_> = page
                        .items()
                        .iter()
                        .filter_map(|item| flatten_scorecard(&convert_image(item)))
                        .collect();
                    self.writer.write(entity.table_name(), &records).await?
                }
            };
            info!(total = total, "Backfill progress");

            start_key = page.last_evaluated_key().cloned();
            if start_key.is_none() {
                break;
            }
        }

        info!(table = %table_name, total = total, "Backfill complete");
        Ok(total)
    }
}

/// Convert one scanned item into the stream attribute model, so the
/// flatteners see the same shape for backfill and stream records.
fn convert_image(item: &HashMap<String, SdkAttributeValue>) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(k, v)| (k.clone(), convert_value(v)))
        .collect()
}

fn convert_value(value: &SdkAttributeValue) -> AttributeValue {
    match value {
        SdkAttributeValue::S(s) => AttributeValue::S(s.clone()),
        SdkAttributeValue::N(n) => AttributeValue::N(n.clone()),
        SdkAttributeValue::Bool(b) => AttributeValue::Bool(*b),
        SdkAttributeValue::Null(b) => AttributeValue::Null(*b),
        SdkAttributeValue::M(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), convert_value(v)))
                .collect(),
        ),
        SdkAttributeValue::L(items) => {
            AttributeValue::L(items.iter().map(convert_value).collect())
        }
        SdkAttributeValue::Ss(items) => AttributeValue::SS(items.clone()),
        SdkAttributeValue::Ns(items) => AttributeValue::NS(items.clone()),
        // Binary and other attribute kinds have no analytical mapping
        _ => AttributeValue::Unrecognized(serde_json::Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::attribute::{decode, Scalar};

    #[test]
    fn test_convert_value_scalars() {
        assert_eq!(
            convert_value(&SdkAttributeValue::S("x".to_string())),
            AttributeValue::S("x".to_string())
        );
        assert_eq!(
            convert_value(&SdkAttributeValue::N("42".to_string())),
            AttributeValue::N("42".to_string())
        );
        assert_eq!(
            convert_value(&SdkAttributeValue::Bool(true)),
            AttributeValue::Bool(true)
        );
    }

    #[test]
    fn test_convert_value_nested() {
        let mut inner = HashMap::new();
        inner.insert(
            "score".to_string(),
            SdkAttributeValue::N("3".to_string()),
        );
        let converted = convert_value(&SdkAttributeValue::M(inner));
        let Scalar::Map(decoded) = decode(&converted) else {
            panic!("expected map");
        };
        assert_eq!(decoded.get("score"), Some(&Scalar::Int(3)));
    }

    #[test]
    fn test_convert_value_binary_degrades_to_null() {
        let blob = SdkAttributeValue::B(aws_sdk_dynamodb::primitives::Blob::new(vec![1, 2]));
        assert_eq!(decode(&convert_value(&blob)), Scalar::Null);
    }
}
