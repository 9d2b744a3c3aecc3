//! Object store and catalog configuration.

use serde::Deserialize;

/// Buckets and catalog targets for the ingestion and job paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoresConfig {
    /// Bucket receiving flattened analytical records.
    pub analytics_bucket: String,
    /// Bucket holding transcription outputs.
    pub transcript_bucket: String,
    /// Key prefix for transcript artifacts.
    pub transcript_prefix: String,
    /// Bucket holding async job state.
    pub jobs_bucket: String,
    /// Catalog database containing the analytical tables.
    pub catalog_database: String,
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            analytics_bucket: String::new(),
            transcript_bucket: String::new(),
            transcript_prefix: "parsedFiles/".to_string(),
            jobs_bucket: String::new(),
            catalog_database: "post_call_analytics".to_string(),
        }
    }
}
