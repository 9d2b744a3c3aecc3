//! Flattening of call change records.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::answer::{AnswerType, AnswerTypeClassifier};
use super::attribute::{
    coerced_str_field, decode, image_str, int_field, str_field, AttributeValue, Scalar,
};
use super::partition::Partition;
use super::writer::PartitionRecord;
use crate::storage::TranscriptStore;

/// Analytical projection of one call.
///
/// Append-only: a later change event for the same call produces a new
/// independent record, never an update in place.
#[derive(Debug, Clone, Serialize)]
pub struct FlatCallRecord {
    pub call_id: String,
    pub call_timestamp_utc: String,
    pub agent_id: String,
    pub agent_name: String,
    pub allocation: String,
    pub direction: String,
    pub file_name: String,
    pub first_or_follow_up: String,
    pub medium: String,
    pub program: String,
    pub queue_id: String,
    pub queue_name: String,
    pub session_id: String,
    pub site_id: i64,
    pub site_name: String,
    pub tenant_id: i64,
    pub s3_bucket: String,
    pub call_duration_seconds: u64,
    pub answer_type: AnswerType,
    pub transcript_s3_key: String,
    // Lives in the object path, not the record body
    #[serde(skip)]
    pub partition: Partition,
}

impl PartitionRecord for FlatCallRecord {
    fn partition(&self) -> &Partition {
        &self.partition
    }
}

/// Flattens call images, enriching them with transcript-derived fields.
pub struct CallFlattener {
    transcripts: Arc<dyn TranscriptStore>,
    classifier: AnswerTypeClassifier,
}

impl CallFlattener {
    pub fn new(transcripts: Arc<dyn TranscriptStore>) -> Self {
        let classifier = AnswerTypeClassifier::new(transcripts.clone());
        Self {
            transcripts,
            classifier,
        }
    }

    /// Flatten one call image. Returns `None` when the image has no
    /// usable call identifier; every other irregularity degrades to a
    /// default value so a bad field never drops the record.
    pub async fn flatten(&self, image: &HashMap<String, AttributeValue>) -> Option<FlatCallRecord> {
        let call_id = image_str(image, "callId");
        if call_id.is_empty() {
            debug!("Call image without callId, skipping");
            return None;
        }

        let ts_raw = image_str(image, "callTimestampUTC");
        let partition = match DateTime::parse_from_rfc3339(&ts_raw) {
            Ok(ts) => Partition::from_timestamp(&ts.with_timezone(&Utc)),
            Err(_) => Partition::Unknown,
        };

        let payload = match image.get("payload").map(decode) {
            Some(Scalar::Map(map)) => map,
            _ => HashMap::new(),
        };

        let file_name = str_field(&payload, "file_name");
        let (call_duration_seconds, transcript_s3_key) =
            self.enrich(&call_id, &file_name).await;
        let answer_type = self
            .classifier
            .classify(call_duration_seconds, &transcript_s3_key)
            .await;

        Some(FlatCallRecord {
            call_id,
            call_timestamp_utc: ts_raw,
            agent_id: str_field(&payload, "agentId"),
            agent_name: str_field(&payload, "agentName"),
            allocation: str_field(&payload, "allocation"),
            direction: str_field(&payload, "direction"),
            file_name,
            first_or_follow_up: str_field(&payload, "firstOrFollowUp"),
            medium: str_field(&payload, "medium"),
            program: str_field(&payload, "program"),
            queue_id: coerced_str_field(&payload, "queueId"),
            queue_name: str_field(&payload, "queueName"),
            session_id: str_field(&payload, "sessionId"),
            site_id: int_field(&payload, "siteId"),
            site_name: str_field(&payload, "siteName"),
            tenant_id: int_field(&payload, "tenantId"),
            s3_bucket: str_field(&payload, "s3_bucket"),
            call_duration_seconds,
            answer_type,
            transcript_s3_key,
            partition,
        })
    }

    /// Look up the call's transcript artifact to obtain its duration and
    /// key. A missing or unreadable transcript degrades to zero duration
    /// and no key.
    async fn enrich(&self, call_id: &str, file_name: &str) -> (u64, String) {
        if file_name.is_empty() {
            return (0, String::new());
        }
        let key = self.transcripts.key_for(file_name);
        match self.transcripts.fetch(&key).await {
            Ok(doc) => (doc.audio_duration as u64, key),
            Err(e) => {
                debug!(
                    call_id = %call_id,
                    key = %key,
                    error = %e,
                    "No transcript metadata for call"
                );
                (0, String::new())
            }
        }
    }
}
