//! In-memory storage doubles for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    AnalyticsStore, Catalog, Result, StorageError, TranscriptDoc, TranscriptItem, TranscriptStore,
};
use crate::api::jobs::{JobState, JobStore};
use crate::ingest::partition::Partition;

/// Mock analytics store that records writes in memory.
#[derive(Default)]
pub struct MockAnalyticsStore {
    objects: RwLock<Vec<(String, Vec<u8>)>>,
    fail_on_put: RwLock<bool>,
}

impl MockAnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_put(&self, fail: bool) {
        *self.fail_on_put.write().await = fail;
    }

    /// All writes so far, in order.
    pub async fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.objects.read().await.clone()
    }
}

#[async_trait]
impl AnalyticsStore for MockAnalyticsStore {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        if *self.fail_on_put.read().await {
            return Err(StorageError::StoreFailed("simulated put failure".to_string()));
        }
        self.objects.write().await.push((key.to_string(), body));
        Ok(())
    }
}

/// Mock transcript store with preloaded documents.
#[derive(Default)]
pub struct MockTranscriptStore {
    docs: RwLock<HashMap<String, TranscriptDoc>>,
    fail_on_fetch: RwLock<bool>,
}

impl MockTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document under the key `key_for(file_name)` would produce.
    pub async fn insert(&self, file_name: &str, doc: TranscriptDoc) {
        let key = self.key_for(file_name);
        self.docs.write().await.insert(key, doc);
    }

    pub async fn set_fail_on_fetch(&self, fail: bool) {
        *self.fail_on_fetch.write().await = fail;
    }

    /// Build a document with the given duration and one item per
    /// speaker label.
    pub fn transcript(audio_duration: f64, speakers: &[&str]) -> TranscriptDoc {
        TranscriptDoc {
            audio_duration,
            items: speakers
                .iter()
                .map(|speaker| TranscriptItem {
                    speaker_label: Some(speaker.to_string()),
                    ..Default::default()
                })
                .collect(),
        }
    }
}

#[async_trait]
impl TranscriptStore for MockTranscriptStore {
    fn key_for(&self, file_name: &str) -> String {
        format!("parsedFiles/{}.json", file_name)
    }

    async fn fetch(&self, key: &str) -> Result<TranscriptDoc> {
        if *self.fail_on_fetch.read().await {
            return Err(StorageError::RetrieveFailed(
                "simulated fetch failure".to_string(),
            ));
        }
        self.docs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

/// Mock catalog that records registrations.
#[derive(Default)]
pub struct MockCatalog {
    partitions: RwLock<Vec<(String, Partition)>>,
    fail: RwLock<bool>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    pub async fn registered(&self) -> Vec<(String, Partition)> {
        self.partitions.read().await.clone()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn ensure_partition(&self, table: &str, partition: &Partition) -> Result<()> {
        if *self.fail.read().await {
            return Err(StorageError::CatalogFailed(
                "simulated catalog failure".to_string(),
            ));
        }
        self.partitions
            .write()
            .await
            .push((table.to_string(), partition.clone()));
        Ok(())
    }
}

/// Mock job store backed by a map.
#[derive(Default)]
pub struct MockJobStore {
    jobs: RwLock<HashMap<String, JobState>>,
}

impl MockJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MockJobStore {
    async fn put(&self, job_id: &str, state: &JobState) -> Result<()> {
        self.jobs
            .write()
            .await
            .insert(job_id.to_string(), state.clone());
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<Option<JobState>> {
        Ok(self.jobs.read().await.get(job_id).cloned())
    }
}
