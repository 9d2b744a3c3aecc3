//! S3 job state store.
//!
//! Job state lives at `jobs/{job_id}.json`; the object is overwritten
//! when the job reaches its terminal state.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::super::{Result, StorageError};
use crate::api::jobs::{JobState, JobStore};

const JOB_KEY_PREFIX: &str = "jobs/";

/// S3-backed job store.
pub struct S3JobStore {
    client: Client,
    bucket: String,
}

impl S3JobStore {
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

    fn key(job_id: &str) -> String {
        format!("{}{}.json", JOB_KEY_PREFIX, job_id)
    }
}

#[async_trait]
impl JobStore for S3JobStore {
    async fn put(&self, job_id: &str, state: &JobState) -> Result<()> {
        let body = serde_json::to_vec(state).map_err(|e| {
            StorageError::StoreFailed(format!("job state serialization failed: {}", e))
        })?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(Self::key(job_id))
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| StorageError::StoreFailed(format!("S3 upload failed: {}", e)))?;
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<Option<JobState>> {
        let key = Self::key(job_id);
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("NoSuchKey") || err_str.contains("404") {
                    return Ok(None);
                }
                return Err(StorageError::RetrieveFailed(format!(
                    "S3 download failed: {}",
                    e
                )));
            }
        };

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::RetrieveFailed(format!("S3 body read failed: {}", e)))?
            .into_bytes();

        let state = serde_json::from_slice(&bytes).map_err(|e| StorageError::Malformed {
            key,
            reason: e.to_string(),
        })?;
        Ok(Some(state))
    }
}
