//! Canned agent double for tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AgentClient, AgentError, Result};

/// Mock agent that returns a canned answer and records prompts.
#[derive(Default)]
pub struct MockAgentClient {
    answer: RwLock<String>,
    fail: RwLock<bool>,
    prompts: RwLock<Vec<(String, String)>>,
}

impl MockAgentClient {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: RwLock::new(answer.into()),
            ..Default::default()
        }
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Prompts received so far, as (session_id, prompt) pairs.
    pub async fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.read().await.clone()
    }
}

#[async_trait]
impl AgentClient for MockAgentClient {
    async fn converse(&self, session_id: &str, prompt: &str) -> Result<String> {
        self.prompts
            .write()
            .await
            .push((session_id.to_string(), prompt.to_string()));
        if *self.fail.read().await {
            return Err(AgentError::Invocation("simulated agent failure".to_string()));
        }
        Ok(self.answer.read().await.clone())
    }
}
