//! Flattening of quality-scorecard change records.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::attribute::{decode, image_num, image_str, int_field, str_field, AttributeValue, Scalar};
use super::partition::Partition;
use super::writer::PartitionRecord;

/// Analytical projection of one quality evaluation.
///
/// Each of the six rubric categories contributes a score and an
/// evidence column; absent or malformed categories default to zero and
/// empty text.
#[derive(Debug, Clone, Serialize)]
pub struct FlatScorecardRecord {
    pub guid: String,
    pub datetime: String,
    pub agent: String,
    pub call_type: String,
    pub ingested_at: String,
    pub notes: String,
    pub outcome: String,
    pub overall_score: f64,
    pub primary_intent: String,
    pub resolution_reason: String,
    pub summary: String,
    pub secondary_intent: String,
    pub score_ask_for_payment: i64,
    pub score_confirm_location: i64,
    pub score_features_advantages: i64,
    pub score_handle_objections: i64,
    pub score_size_recommendation: i64,
    pub score_urgency: i64,
    pub evidence_ask_for_payment: String,
    pub evidence_confirm_location: String,
    pub evidence_features_advantages: String,
    pub evidence_handle_objections: String,
    pub evidence_size_recommendation: String,
    pub evidence_urgency: String,
    #[serde(skip)]
    pub partition: Partition,
}

impl PartitionRecord for FlatScorecardRecord {
    fn partition(&self) -> &Partition {
        &self.partition
    }
}

/// Flatten one scorecard image. Returns `None` when the image has no
/// usable guid; any other irregularity degrades to a default value.
pub fn flatten_scorecard(image: &HashMap<String, AttributeValue>) -> Option<FlatScorecardRecord> {
    let guid = image_str(image, "guid");
    if guid.is_empty() {
        debug!("Scorecard image without guid, skipping");
        return None;
    }

    // Datetimes look like "2025-10-08T14-34-19"; only the date prefix
    // is trusted for partitioning.
    let dt_raw = image_str(image, "datetime");
    let partition = Partition::from_date_prefix(&dt_raw);

    let scores = match image.get("scores").map(decode) {
        Some(Scalar::Map(map)) => map,
        _ => HashMap::new(),
    };

    let score = |category: &str| -> i64 {
        match scores.get(category) {
            Some(Scalar::Map(entry)) => int_field(entry, "score"),
            _ => 0,
        }
    };
    let evidence = |category: &str| -> String {
        match scores.get(category) {
            Some(Scalar::Map(entry)) => str_field(entry, "evidence"),
            _ => String::new(),
        }
    };

    Some(FlatScorecardRecord {
        guid,
        datetime: dt_raw,
        agent: image_str(image, "agent"),
        call_type: image_str(image, "callType"),
        ingested_at: image_str(image, "ingestedAt"),
        notes: image_str(image, "notes"),
        outcome: image_str(image, "outcome"),
        overall_score: image_num(image, "overallScore"),
        primary_intent: image_str(image, "primaryIntent"),
        resolution_reason: image_str(image, "resolutionReason"),
        summary: image_str(image, "summary"),
        secondary_intent: image_str(image, "secondaryIntent"),
        score_ask_for_payment: score("askForPayment"),
        score_confirm_location: score("confirmLocation"),
        score_features_advantages: score("featuresAdvantagesBenefits"),
        score_handle_objections: score("handleObjections"),
        score_size_recommendation: score("sizeRecommendation"),
        score_urgency: score("urgency"),
        evidence_ask_for_payment: evidence("askForPayment"),
        evidence_confirm_location: evidence("confirmLocation"),
        evidence_features_advantages: evidence("featuresAdvantagesBenefits"),
        evidence_handle_objections: evidence("handleObjections"),
        evidence_size_recommendation: evidence("sizeRecommendation"),
        evidence_urgency: evidence("urgency"),
        partition,
    })
}
