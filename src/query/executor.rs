//! Submit, poll, and format one query execution.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use super::{format, validate, ExecutionState, QueryEngine, QueryError, Result};

/// Default interval between completion polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Default wall-clock ceiling for one execution. Sized to fit inside
/// the hosting platform's 60 second invocation limit.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(55);
/// Default cap on data rows returned to the agent.
pub const DEFAULT_MAX_ROWS: usize = 100;

/// Drives one SQL execution from validation through formatted results.
pub struct QueryExecutor {
    engine: Arc<dyn QueryEngine>,
    database: String,
    poll_interval: Duration,
    timeout: Duration,
    max_rows: usize,
}

impl QueryExecutor {
    pub fn new(engine: Arc<dyn QueryEngine>, database: impl Into<String>) -> Self {
        Self {
            engine,
            database: database.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_QUERY_TIMEOUT,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Override the poll interval, timeout ceiling, and row cap.
    pub fn with_limits(
        mut self,
        poll_interval: Duration,
        timeout: Duration,
        max_rows: usize,
    ) -> Self {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
        self.max_rows = max_rows;
        self
    }

    /// Validate, submit, poll to completion, and format the results.
    ///
    /// An execution still running at the timeout ceiling is actively
    /// cancelled before the timeout error is returned, so no runaway
    /// query is left behind.
    pub async fn run(&self, sql: &str) -> Result<String> {
        validate::check_read_only(sql)?;

        let execution_id = self.engine.submit(sql, &self.database).await?;
        info!(execution_id = %execution_id, "Submitted query");

        let started = Instant::now();
        loop {
            let status = self.engine.status(&execution_id).await?;
            match status.state {
                ExecutionState::Succeeded => break,
                ExecutionState::Failed | ExecutionState::Cancelled => {
                    let reason = status
                        .reason
                        .unwrap_or_else(|| "Unknown error".to_string());
                    return Err(QueryError::Execution {
                        state: status.state,
                        reason,
                    });
                }
                ExecutionState::Queued | ExecutionState::Running => {}
            }

            if started.elapsed() > self.timeout {
                if let Err(e) = self.engine.stop(&execution_id).await {
                    warn!(
                        execution_id = %execution_id,
                        error = %e,
                        "Failed to stop timed-out query"
                    );
                }
                return Err(QueryError::Timeout(self.timeout.as_secs()));
            }

            sleep(self.poll_interval).await;
        }

        let results = self
            .engine
            .results(&execution_id, self.max_rows + 1)
            .await?;
        Ok(format::render_table(&results, self.max_rows))
    }
}
