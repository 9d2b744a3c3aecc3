//! Read-only query execution against the analytics catalog.
//!
//! SQL produced by the NL agent is validated, submitted to the query
//! engine, polled to completion under a wall-clock ceiling, and
//! formatted as bounded plain text the agent can read back.

mod athena;
mod executor;
mod format;
pub mod mock;
mod validate;

pub use athena::AthenaQueryEngine;
pub use executor::{QueryExecutor, DEFAULT_MAX_ROWS, DEFAULT_POLL_INTERVAL, DEFAULT_QUERY_TIMEOUT};
pub use format::render_table;
pub use validate::check_read_only;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during query execution.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Only SELECT queries are permitted")]
    Rejected,

    #[error("Query {state}: {reason}")]
    Execution {
        state: ExecutionState,
        reason: String,
    },

    #[error("Query timed out after {0} seconds")]
    Timeout(u64),

    #[error("Query engine call failed: {0}")]
    Engine(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Engine-reported execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// One poll's view of an execution.
#[derive(Debug, Clone)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
    /// Engine's stated reason, present on FAILED/CANCELLED.
    pub reason: Option<String>,
}

/// One page of results. The first row is the header.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub rows: Vec<Vec<String>>,
    /// More rows exist beyond this page.
    pub has_more: bool,
}

/// SQL execution service reached through submit/poll/fetch/stop.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Submit SQL; returns the engine-assigned execution id.
    async fn submit(&self, sql: &str, database: &str) -> Result<String>;

    /// Fetch the current state of an execution.
    async fn status(&self, execution_id: &str) -> Result<ExecutionStatus>;

    /// Fetch up to `max_rows` rows including the header row.
    async fn results(&self, execution_id: &str, max_rows: usize) -> Result<ResultSet>;

    /// Request cancellation of a running execution.
    async fn stop(&self, execution_id: &str) -> Result<()>;
}
