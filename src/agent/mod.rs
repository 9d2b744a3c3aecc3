//! Natural-language agent client.
//!
//! The hosted agent turns questions into SQL and answers; it calls back
//! into this crate's query pipeline through the `action` adapter.

pub mod action;
pub mod mock;

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::types::ResponseStream;
use aws_sdk_bedrockagentruntime::Client;
use thiserror::Error;

/// Errors that can occur when conversing with the agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent invocation failed: {0}")]
    Invocation(String),

    #[error("Agent response stream failed: {0}")]
    Stream(String),
}

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Conversational NL agent: prompt in, streamed answer collected out.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn converse(&self, session_id: &str, prompt: &str) -> Result<String>;
}

/// Bedrock-hosted agent client.
pub struct BedrockAgentClient {
    client: Client,
    agent_id: String,
    alias_id: String,
}

impl BedrockAgentClient {
    pub async fn new(agent_id: impl Into<String>, alias_id: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            agent_id: agent_id.into(),
            alias_id: alias_id.into(),
        }
    }

    /// Create with explicit client (for testing).
    pub fn with_client(
        client: Client,
        agent_id: impl Into<String>,
        alias_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            agent_id: agent_id.into(),
            alias_id: alias_id.into(),
        }
    }
}

#[async_trait]
impl AgentClient for BedrockAgentClient {
    async fn converse(&self, session_id: &str, prompt: &str) -> Result<String> {
        let response = self
            .client
            .invoke_agent()
            .agent_id(&self.agent_id)
            .agent_alias_id(&self.alias_id)
            .session_id(session_id)
            .input_text(prompt)
            .send()
            .await
            .map_err(|e| AgentError::Invocation(e.to_string()))?;

        let mut answer = String::new();
        let mut completion = response.completion;
        while let Some(event) = completion
            .recv()
            .await
            .map_err(|e| AgentError::Stream(e.to_string()))?
        {
            if let ResponseStream::Chunk(part) = event {
                if let Some(bytes) = part.bytes() {
                    answer.push_str(&String::from_utf8_lossy(bytes.as_ref()));
                }
            }
        }

        Ok(answer)
    }
}
