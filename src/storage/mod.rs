//! Storage seams for external object stores and the data catalog.
//!
//! Every external store the pipelines touch is reached through a trait
//! defined here, so each can be substituted with a test double.
//! Production backends live in `s3` and `glue`; in-memory doubles for
//! tests live in `mock`.

pub mod glue;
pub mod mock;
pub mod s3;

pub use glue::GlueCatalog;
pub use s3::{S3AnalyticsStore, S3JobStore, S3TranscriptStore};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::ingest::partition::Partition;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to store object: {0}")]
    StoreFailed(String),

    #[error("Failed to retrieve object: {0}")]
    RetrieveFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Malformed document {key}: {reason}")]
    Malformed { key: String, reason: String },

    #[error("Catalog operation failed: {0}")]
    CatalogFailed(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Bulk-write destination for flattened analytical records.
///
/// The ingestion path only ever appends fresh objects; it never reads
/// back or merges with what it wrote.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Write one object at `key`.
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;
}

/// One timed item of a transcript, optionally tagged with a speaker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranscriptItem {
    pub speaker_label: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub content: Option<String>,
}

/// Transcript artifact produced by the transcription service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranscriptDoc {
    /// Recording length in seconds.
    pub audio_duration: f64,
    pub items: Vec<TranscriptItem>,
}

impl TranscriptDoc {
    /// Number of distinct, non-empty speaker labels across all items.
    pub fn distinct_speakers(&self) -> usize {
        let mut speakers = std::collections::HashSet::new();
        for item in &self.items {
            if let Some(label) = &item.speaker_label {
                if !label.is_empty() {
                    speakers.insert(label.as_str());
                }
            }
        }
        speakers.len()
    }
}

/// Content-addressed fetch of transcript artifacts.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Object key for a recording's transcript artifact.
    fn key_for(&self, file_name: &str) -> String;

    /// Fetch and parse the transcript at `key`.
    async fn fetch(&self, key: &str) -> Result<TranscriptDoc>;
}

/// Partition registration against the analytical data catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Register `partition` for `table` if absent. An already-registered
    /// partition is a success.
    async fn ensure_partition(&self, table: &str, partition: &Partition) -> Result<()>;
}
