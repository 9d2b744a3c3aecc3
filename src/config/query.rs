//! Query engine configuration.

use std::time::Duration;

use serde::Deserialize;

/// Limits and targets for query execution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Engine workgroup queries are submitted under.
    pub workgroup: String,
    /// Database the agent's queries run against.
    pub database: String,
    /// Interval between completion polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Wall-clock ceiling for one execution, in seconds.
    pub timeout_secs: u64,
    /// Cap on data rows returned to the agent.
    pub max_rows: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            workgroup: "primary".to_string(),
            database: "post_call_analytics".to_string(),
            poll_interval_ms: 500,
            timeout_secs: 55,
            max_rows: 100,
        }
    }
}

impl QueryConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
