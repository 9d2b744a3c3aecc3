//! Scripted query engine double for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ExecutionState, ExecutionStatus, QueryEngine, QueryError, Result, ResultSet};

/// Mock query engine that replays a scripted status sequence.
///
/// Statuses are consumed in order; the last one repeats once the script
/// is exhausted, so a single `Running` entry models an execution that
/// never completes.
#[derive(Default)]
pub struct MockQueryEngine {
    statuses: RwLock<VecDeque<ExecutionStatus>>,
    results: RwLock<ResultSet>,
    submissions: RwLock<Vec<(String, String)>>,
    stops: RwLock<usize>,
}

impl MockQueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_status(&self, state: ExecutionState, reason: Option<&str>) {
        self.statuses.write().await.push_back(ExecutionStatus {
            state,
            reason: reason.map(String::from),
        });
    }

    pub async fn set_results(&self, rows: Vec<Vec<String>>, has_more: bool) {
        *self.results.write().await = ResultSet { rows, has_more };
    }

    pub async fn submissions(&self) -> Vec<(String, String)> {
        self.submissions.read().await.clone()
    }

    pub async fn stop_count(&self) -> usize {
        *self.stops.read().await
    }
}

#[async_trait]
impl QueryEngine for MockQueryEngine {
    async fn submit(&self, sql: &str, database: &str) -> Result<String> {
        self.submissions
            .write()
            .await
            .push((sql.to_string(), database.to_string()));
        Ok("exec-1".to_string())
    }

    async fn status(&self, _execution_id: &str) -> Result<ExecutionStatus> {
        let mut statuses = self.statuses.write().await;
        if statuses.len() > 1 {
            Ok(statuses.pop_front().unwrap())
        } else {
            statuses
                .front()
                .cloned()
                .ok_or_else(|| QueryError::Engine("no scripted status".to_string()))
        }
    }

    async fn results(&self, _execution_id: &str, max_rows: usize) -> Result<ResultSet> {
        let full = self.results.read().await.clone();
        let rows: Vec<Vec<String>> = full.rows.iter().take(max_rows).cloned().collect();
        let has_more = full.has_more || full.rows.len() > max_rows;
        Ok(ResultSet { rows, has_more })
    }

    async fn stop(&self, _execution_id: &str) -> Result<()> {
        *self.stops.write().await += 1;
        Ok(())
    }
}
