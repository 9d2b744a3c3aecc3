//! Athena query engine backend.

use async_trait::async_trait;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState};
use aws_sdk_athena::Client;

use super::{ExecutionState, ExecutionStatus, QueryEngine, QueryError, Result, ResultSet};

/// Athena-backed query engine.
pub struct AthenaQueryEngine {
    client: Client,
    workgroup: String,
}

impl AthenaQueryEngine {
    pub async fn new(workgroup: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            workgroup: workgroup.into(),
        }
    }

    /// Create with explicit client (for testing).
    pub fn with_client(client: Client, workgroup: impl Into<String>) -> Self {
        Self {
            client,
            workgroup: workgroup.into(),
        }
    }
}

#[async_trait]
impl QueryEngine for AthenaQueryEngine {
    async fn submit(&self, sql: &str, database: &str) -> Result<String> {
        let context = QueryExecutionContext::builder().database(database).build();
        let response = self
            .client
            .start_query_execution()
            .query_string(sql)
            .query_execution_context(context)
            .work_group(&self.workgroup)
            .send()
            .await
            .map_err(|e| QueryError::Engine(format!("start_query_execution failed: {}", e)))?;

        response
            .query_execution_id()
            .map(String::from)
            .ok_or_else(|| QueryError::Engine("no execution id returned".to_string()))
    }

    async fn status(&self, execution_id: &str) -> Result<ExecutionStatus> {
        let response = self
            .client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| QueryError::Engine(format!("get_query_execution failed: {}", e)))?;

        let status = response
            .query_execution()
            .and_then(|q| q.status())
            .ok_or_else(|| QueryError::Engine("execution status missing".to_string()))?;

        let state = match status.state() {
            Some(QueryExecutionState::Queued) => ExecutionState::Queued,
            Some(QueryExecutionState::Succeeded) => ExecutionState::Succeeded,
            Some(QueryExecutionState::Failed) => ExecutionState::Failed,
            Some(QueryExecutionState::Cancelled) => ExecutionState::Cancelled,
            // Unknown states keep polling until the ceiling
            _ => ExecutionState::Running,
        };

        Ok(ExecutionStatus {
            state,
            reason: status.state_change_reason().map(String::from),
        })
    }

    async fn results(&self, execution_id: &str, max_rows: usize) -> Result<ResultSet> {
        let response = self
            .client
            .get_query_results()
            .query_execution_id(execution_id)
            .max_results(max_rows as i32)
            .send()
            .await
            .map_err(|e| QueryError::Engine(format!("get_query_results failed: {}", e)))?;

        let mut rows = Vec::new();
        if let Some(result_set) = response.result_set() {
            for row in result_set.rows() {
                rows.push(
                    row.data()
                        .iter()
                        .map(|d| d.var_char_value().unwrap_or_default().to_string())
                        .collect(),
                );
            }
        }

        Ok(ResultSet {
            rows,
            has_more: response.next_token().is_some(),
        })
    }

    async fn stop(&self, execution_id: &str) -> Result<()> {
        self.client
            .stop_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| QueryError::Engine(format!("stop_query_execution failed: {}", e)))?;
        Ok(())
    }
}
