//! Job state model and store seam for the async request facade.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::storage::Result;

/// State of one chat or report job.
///
/// The serialized form is the polling contract: a `status` discriminator
/// of `processing`, `completed`, or `error`, with the payload fields
/// inlined beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobState {
    Processing,
    Completed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        report: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        report_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_to: Option<String>,
        session_id: String,
    },
    Error {
        error: String,
    },
}

impl JobState {
    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

/// Persistence seam for job state.
///
/// A resolved job's state is immutable once stored; repeated reads of
/// the same id return the same terminal result.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn put(&self, job_id: &str, state: &JobState) -> Result<()>;
    async fn get(&self, job_id: &str) -> Result<Option<JobState>>;
}
