//! Partition-grouped bulk writes to the analytics store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::partition::Partition;
use crate::storage::{AnalyticsStore, Catalog, Result, StorageError};

/// A flattened record that knows its storage partition.
pub trait PartitionRecord: Serialize {
    fn partition(&self) -> &Partition;
}

/// Groups records by partition and performs one bulk write per group.
///
/// Object keys embed a UTC microsecond timestamp plus a body-hash
/// suffix: redelivery of an identical group in the same microsecond
/// overwrites its own object instead of appending a duplicate, and
/// distinct bodies never collide. Row-level dedup across deliveries is
/// left to the query layer.
pub struct PartitionedWriter {
    store: Arc<dyn AnalyticsStore>,
    catalog: Arc<dyn Catalog>,
}

impl PartitionedWriter {
    pub fn new(store: Arc<dyn AnalyticsStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    /// Write `records` under `entity`, one object per partition group.
    /// An empty input performs no writes. Returns the number of records
    /// written.
    pub async fn write<R: PartitionRecord>(&self, entity: &str, records: &[R]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut groups: HashMap<&Partition, Vec<&R>> = HashMap::new();
        for record in records {
            groups.entry(record.partition()).or_default().push(record);
        }

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%6f").to_string();

        let mut written = 0;
        for (partition, group) in groups {
            let mut lines = Vec::with_capacity(group.len());
            for record in &group {
                let line = serde_json::to_string(record).map_err(|e| {
                    StorageError::StoreFailed(format!("record serialization failed: {}", e))
                })?;
                lines.push(line);
            }
            let body = lines.join("\n").into_bytes();

            let mut hasher = Sha256::new();
            hasher.update(&body);
            let digest = hex::encode(hasher.finalize());

            let key = format!(
                "{}/{}/{}-{}.json",
                entity,
                partition.path(),
                stamp,
                &digest[..12]
            );
            self.store.put_object(&key, body).await?;
            info!(
                entity = %entity,
                partition = %partition.path(),
                records = group.len(),
                key = %key,
                "Wrote partition group"
            );

            if let Err(e) = self.catalog.ensure_partition(entity, partition).await {
                warn!(
                    entity = %entity,
                    partition = %partition.path(),
                    error = %e,
                    "Failed to register partition"
                );
            }

            written += group.len();
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::{MockAnalyticsStore, MockCatalog};

    #[derive(Serialize)]
    struct Row {
        id: String,
        #[serde(skip)]
        partition: Partition,
    }

    impl PartitionRecord for Row {
        fn partition(&self) -> &Partition {
            &self.partition
        }
    }

    fn row(id: &str, year: &str) -> Row {
        Row {
            id: id.to_string(),
            partition: Partition::Day {
                year: year.to_string(),
                month: "10".to_string(),
                day: "08".to_string(),
            },
        }
    }

    fn writer(
        store: &Arc<MockAnalyticsStore>,
        catalog: &Arc<MockCatalog>,
    ) -> PartitionedWriter {
        PartitionedWriter::new(store.clone(), catalog.clone())
    }

    #[tokio::test]
    async fn test_empty_input_writes_nothing() {
        let store = Arc::new(MockAnalyticsStore::new());
        let catalog = Arc::new(MockCatalog::new());
        let written = writer(&store, &catalog)
            .write::<Row>("calls", &[])
            .await
            .unwrap();
        assert_eq!(written, 0);
        assert!(store.writes().await.is_empty());
        assert!(catalog.registered().await.is_empty());
    }

    #[tokio::test]
    async fn test_one_write_per_partition() {
        let store = Arc::new(MockAnalyticsStore::new());
        let catalog = Arc::new(MockCatalog::new());
        let records = vec![row("a", "2025"), row("b", "2026"), row("c", "2025")];

        let written = writer(&store, &catalog)
            .write("calls", &records)
            .await
            .unwrap();
        assert_eq!(written, 3);

        let writes = store.writes().await;
        assert_eq!(writes.len(), 2);

        let (key_2025, body_2025) = writes
            .iter()
            .find(|(k, _)| k.starts_with("calls/year=2025/month=10/day=08/"))
            .unwrap();
        assert!(key_2025.ends_with(".json"));
        let lines: Vec<&str> = std::str::from_utf8(body_2025).unwrap().lines().collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(parsed.get("partition").is_none());
            assert!(matches!(parsed["id"].as_str(), Some("a") | Some("c")));
        }

        let writes_2026: Vec<_> = writes
            .iter()
            .filter(|(k, _)| k.starts_with("calls/year=2026/"))
            .collect();
        assert_eq!(writes_2026.len(), 1);

        assert_eq!(catalog.registered().await.len(), 2);
    }

    #[tokio::test]
    async fn test_body_hash_distinguishes_keys() {
        let store = Arc::new(MockAnalyticsStore::new());
        let catalog = Arc::new(MockCatalog::new());
        let w = writer(&store, &catalog);

        w.write("calls", &[row("a", "2025")]).await.unwrap();
        w.write("calls", &[row("b", "2025")]).await.unwrap();

        let writes = store.writes().await;
        assert_eq!(writes.len(), 2);
        let suffix = |key: &str| key.rsplit('-').next().unwrap().to_string();
        assert_ne!(suffix(&writes[0].0), suffix(&writes[1].0));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(MockAnalyticsStore::new());
        store.set_fail_on_put(true).await;
        let catalog = Arc::new(MockCatalog::new());
        let result = writer(&store, &catalog)
            .write("calls", &[row("a", "2025")])
            .await;
        assert!(matches!(result, Err(StorageError::StoreFailed(_))));
    }

    #[tokio::test]
    async fn test_catalog_failure_does_not_fail_write() {
        let store = Arc::new(MockAnalyticsStore::new());
        let catalog = Arc::new(MockCatalog::new());
        catalog.set_fail(true).await;
        let written = writer(&store, &catalog)
            .write("calls", &[row("a", "2025")])
            .await
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(store.writes().await.len(), 1);
    }
}
