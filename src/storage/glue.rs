//! Glue catalog partition registration.
//!
//! Newly written partition paths are registered so the query engine can
//! see them without a crawler run. Registration copies the table's
//! storage descriptor with a partition-specific location.

use async_trait::async_trait;
use aws_sdk_glue::types::{PartitionInput, StorageDescriptor};
use aws_sdk_glue::Client;
use tracing::debug;

use super::{Catalog, Result, StorageError};
use crate::ingest::partition::Partition;

/// Glue-backed catalog.
pub struct GlueCatalog {
    client: Client,
    database: String,
}

impl GlueCatalog {
    pub async fn new(database: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            database: database.into(),
        }
    }

    /// Create with explicit client (for testing).
    pub fn with_client(client: Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }
}

#[async_trait]
impl Catalog for GlueCatalog {
    async fn ensure_partition(&self, table: &str, partition: &Partition) -> Result<()> {
        let table_resp = self
            .client
            .get_table()
            .database_name(&self.database)
            .name(table)
            .send()
            .await
            .map_err(|e| StorageError::CatalogFailed(format!("get_table failed: {}", e)))?;

        let Some(sd) = table_resp.table().and_then(|t| t.storage_descriptor()) else {
            return Err(StorageError::CatalogFailed(format!(
                "table {} has no storage descriptor",
                table
            )));
        };

        let base = sd.location().unwrap_or_default().trim_end_matches('/');
        let location = format!("{}/{}/", base, partition.path());

        let partition_sd = StorageDescriptor::builder()
            .set_columns(Some(sd.columns().to_vec()))
            .set_input_format(sd.input_format().map(String::from))
            .set_output_format(sd.output_format().map(String::from))
            .set_serde_info(sd.serde_info().cloned())
            .location(location)
            .build();

        let input = PartitionInput::builder()
            .set_values(Some(partition.values()))
            .storage_descriptor(partition_sd)
            .build();

        // batch_create_partition reports per-partition errors in the
        // response body, not as call failures
        let result = self
            .client
            .batch_create_partition()
            .database_name(&self.database)
            .table_name(table)
            .partition_input_list(input)
            .send()
            .await
            .map_err(|e| {
                StorageError::CatalogFailed(format!("batch_create_partition failed: {}", e))
            })?;

        for error in result.errors() {
            let code = error
                .error_detail()
                .and_then(|d| d.error_code())
                .unwrap_or_default();
            if code == "AlreadyExistsException" {
                continue;
            }
            return Err(StorageError::CatalogFailed(format!(
                "partition registration error: {:?}",
                error
            )));
        }

        debug!(
            table = %table,
            partition = %partition.path(),
            "Partition registered"
        );
        Ok(())
    }
}
