//! S3 analytics store.
//!
//! Flattened records land as line-delimited JSON objects:
//! ```text
//! s3://{bucket}/{entity}/year={y}/month={m}/day={d}/{name}.json
//! ```

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use super::super::{AnalyticsStore, Result, StorageError};

/// S3-backed analytics store.
pub struct S3AnalyticsStore {
    client: Client,
    bucket: String,
}

impl S3AnalyticsStore {
    pub async fn new(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            bucket: bucket.into(),
        }
    }

    /// Create with explicit client (for testing).
    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl AnalyticsStore for S3AnalyticsStore {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| StorageError::StoreFailed(format!("S3 upload failed: {}", e)))?;

        debug!(
            bucket = %self.bucket,
            key = %key,
            size = size,
            "Stored analytics object"
        );
        Ok(())
    }
}
