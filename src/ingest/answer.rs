//! Answer-type classification for outbound calls.
//!
//! A heuristic oracle, not ground truth: it combines call duration with
//! the number of distinct speakers in the transcript. The thresholds are
//! contractual; changing them changes reported business metrics.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::storage::TranscriptStore;

/// Calls shorter than this are treated as never answered.
pub const MIN_CONVERSATION_SECS: u64 = 10;
/// With no transcript available, calls longer than this are assumed to
/// have reached a human.
pub const ASSUME_HUMAN_SECS: u64 = 30;

/// Classification of how an outbound call was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnswerType {
    Human,
    Voicemail,
    NoAnswer,
    Unknown,
}

/// Classifies calls from duration plus transcript speaker counts.
pub struct AnswerTypeClassifier {
    transcripts: Arc<dyn TranscriptStore>,
}

impl AnswerTypeClassifier {
    pub fn new(transcripts: Arc<dyn TranscriptStore>) -> Self {
        Self { transcripts }
    }

    /// Classify one call. Decision order:
    ///
    /// 1. zero duration: no signal, `Unknown`
    /// 2. under 10 seconds: `NoAnswer`
    /// 3. no transcript key: `Unknown`
    /// 4. by distinct speakers: two or more `Human`, one `Voicemail`,
    ///    none `Unknown`
    /// 5. transcript fetch failed: over 30 seconds `Human`, else `Unknown`
    pub async fn classify(&self, duration_seconds: u64, transcript_key: &str) -> AnswerType {
        if duration_seconds == 0 {
            return AnswerType::Unknown;
        }
        if duration_seconds < MIN_CONVERSATION_SECS {
            return AnswerType::NoAnswer;
        }
        if transcript_key.is_empty() {
            return AnswerType::Unknown;
        }

        match self.transcripts.fetch(transcript_key).await {
            Ok(doc) => match doc.distinct_speakers() {
                0 => AnswerType::Unknown,
                1 => AnswerType::Voicemail,
                _ => AnswerType::Human,
            },
            Err(e) => {
                debug!(
                    key = %transcript_key,
                    error = %e,
                    "Transcript unavailable, falling back to duration"
                );
                if duration_seconds > ASSUME_HUMAN_SECS {
                    AnswerType::Human
                } else {
                    AnswerType::Unknown
                }
            }
        }
    }
}
