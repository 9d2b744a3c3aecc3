//! Async job facade over the NL agent.
//!
//! The inbound platform enforces a synchronous call ceiling shorter
//! than a typical agent conversation, so submissions store a
//! `processing` marker, run the agent call as a detached task, and
//! return a job id immediately; callers poll for the terminal state.
//! `run_chat_job` and `run_report_job` are the directly awaitable
//! cores, so a host without that ceiling can skip the indirection.

pub mod jobs;
pub mod reports;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use jobs::{JobState, JobStore};

use crate::agent::AgentClient;

/// Upper bound on question length, in characters.
pub const MAX_QUESTION_CHARS: usize = 2000;

/// Errors returned to the inbound caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("question is required")]
    MissingQuestion,

    #[error("question must be under {} characters", MAX_QUESTION_CHARS)]
    QuestionTooLong,

    #[error("unknown report_type {0:?}; valid types: daily_summary, agent_performance, outbound_callbacks")]
    UnknownReportType(String),

    #[error("invalid job_id format")]
    InvalidJobId,

    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Ticket returned to the caller at submission time.
#[derive(Debug, Clone, Serialize)]
pub struct JobTicket {
    pub job_id: String,
    pub status: &'static str,
}

/// Request facade: accepts questions and report requests, delegates to
/// the agent, and answers job polls.
#[derive(Clone)]
pub struct ApiService {
    agent: Arc<dyn AgentClient>,
    jobs: Arc<dyn JobStore>,
}

impl ApiService {
    pub fn new(agent: Arc<dyn AgentClient>, jobs: Arc<dyn JobStore>) -> Self {
        Self { agent, jobs }
    }

    /// Accept a question. Reuses the caller's session id when given so
    /// the agent keeps conversational context.
    pub async fn start_chat(
        &self,
        question: &str,
        session_id: Option<String>,
    ) -> Result<JobTicket> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ApiError::MissingQuestion);
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(ApiError::QuestionTooLong);
        }

        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let job_id = Uuid::new_v4().to_string();
        info!(job_id = %job_id, chars = question.chars().count(), "Accepted chat job");

        self.jobs.put(&job_id, &JobState::Processing).await?;

        let service = self.clone();
        let question = question.to_string();
        let spawned_job_id = job_id.clone();
        tokio::spawn(async move {
            service
                .run_chat_job(&spawned_job_id, &question, &session_id)
                .await;
        });

        Ok(JobTicket {
            job_id,
            status: "processing",
        })
    }

    /// Accept a report request for one of the canned report types.
    pub async fn start_report(
        &self,
        report_type: &str,
        date_from: &str,
        date_to: &str,
    ) -> Result<JobTicket> {
        let Some(prompt) = reports::report_prompt(report_type, date_from, date_to) else {
            return Err(ApiError::UnknownReportType(report_type.to_string()));
        };

        let job_id = Uuid::new_v4().to_string();
        info!(job_id = %job_id, report_type = %report_type, "Accepted report job");

        self.jobs.put(&job_id, &JobState::Processing).await?;

        let service = self.clone();
        let spawned_job_id = job_id.clone();
        let report_type = report_type.to_string();
        let date_from = date_from.to_string();
        let date_to = date_to.to_string();
        tokio::spawn(async move {
            service
                .run_report_job(&spawned_job_id, &report_type, &date_from, &date_to, &prompt)
                .await;
        });

        Ok(JobTicket {
            job_id,
            status: "processing",
        })
    }

    /// Awaitable core of a chat job; stores the terminal state.
    pub async fn run_chat_job(&self, job_id: &str, question: &str, session_id: &str) {
        let terminal = match self.agent.converse(session_id, question).await {
            Ok(answer) => JobState::Completed {
                answer: Some(answer),
                report: None,
                report_type: None,
                date_from: None,
                date_to: None,
                session_id: session_id.to_string(),
            },
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Chat job failed");
                JobState::Error {
                    error: e.to_string(),
                }
            }
        };
        self.store_terminal(job_id, &terminal).await;
    }

    /// Awaitable core of a report job; stores the terminal state.
    pub async fn run_report_job(
        &self,
        job_id: &str,
        report_type: &str,
        date_from: &str,
        date_to: &str,
        prompt: &str,
    ) {
        // Reports always start a fresh agent session
        let session_id = Uuid::new_v4().to_string();
        let terminal = match self.agent.converse(&session_id, prompt).await {
            Ok(report) => JobState::Completed {
                answer: None,
                report: Some(report),
                report_type: Some(report_type.to_string()),
                date_from: Some(date_from.to_string()),
                date_to: Some(date_to.to_string()),
                session_id,
            },
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Report job failed");
                JobState::Error {
                    error: e.to_string(),
                }
            }
        };
        self.store_terminal(job_id, &terminal).await;
    }

    /// Poll a job. Idempotent: a resolved job keeps returning the same
    /// terminal state.
    pub async fn job_status(&self, job_id: &str) -> Result<JobState> {
        if Uuid::parse_str(job_id).is_err() {
            return Err(ApiError::InvalidJobId);
        }
        match self.jobs.get(job_id).await? {
            Some(state) => Ok(state),
            None => Err(ApiError::JobNotFound(job_id.to_string())),
        }
    }

    async fn store_terminal(&self, job_id: &str, terminal: &JobState) {
        if let Err(e) = self.jobs.put(job_id, terminal).await {
            error!(job_id = %job_id, error = %e, "Failed to store job result");
        }
    }
}
