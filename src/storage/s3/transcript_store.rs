//! S3 transcript store.
//!
//! Transcript artifacts are stored by the transcription service as
//! `{prefix}{file_name}.json` in its output bucket.

use async_trait::async_trait;
use aws_sdk_s3::Client;

use super::super::{Result, StorageError, TranscriptDoc, TranscriptStore};

/// S3-backed transcript store.
pub struct S3TranscriptStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3TranscriptStore {
    pub async fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create with explicit client (for testing).
    pub fn with_client(
        client: Client,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl TranscriptStore for S3TranscriptStore {
    fn key_for(&self, file_name: &str) -> String {
        format!("{}{}.json", self.prefix, file_name)
    }

    async fn fetch(&self, key: &str) -> Result<TranscriptDoc> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("NoSuchKey") || err_str.contains("404") {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::RetrieveFailed(format!("S3 download failed: {}", e))
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::RetrieveFailed(format!("S3 body read failed: {}", e)))?
            .into_bytes();

        serde_json::from_slice(&bytes).map_err(|e| StorageError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}
