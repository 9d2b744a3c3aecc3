//! Tool-call adapter exposing the query pipeline to the NL agent.
//!
//! The agent runtime invokes its SQL tool with a function-call envelope
//! and expects the result back as plain text. Errors are part of that
//! text contract: the agent reads them and rephrases, so they are never
//! surfaced as failed calls.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::query::{QueryError, QueryExecutor};

/// Parameter name carrying the SQL text.
pub const SQL_PARAMETER: &str = "sql_query";

/// Inbound tool invocation from the agent runtime.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionRequest {
    #[serde(rename = "actionGroup")]
    pub action_group: String,
    pub function: String,
    pub parameters: Vec<ActionParameter>,
}

/// One named tool parameter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionParameter {
    pub name: String,
    pub value: String,
}

/// Outbound envelope in the agent runtime's expected shape.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    #[serde(rename = "messageVersion")]
    pub message_version: String,
    pub response: ActionResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    #[serde(rename = "actionGroup")]
    pub action_group: String,
    pub function: String,
    #[serde(rename = "functionResponse")]
    pub function_response: FunctionResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionResponse {
    #[serde(rename = "responseBody")]
    pub response_body: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseBody {
    #[serde(rename = "TEXT")]
    pub text: TextBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBody {
    pub body: String,
}

impl ActionResponse {
    /// Build a text response echoing the request's routing fields.
    pub fn text(request: &ActionRequest, body: String) -> Self {
        Self {
            message_version: "1.0".to_string(),
            response: ActionResult {
                action_group: request.action_group.clone(),
                function: request.function.clone(),
                function_response: FunctionResponse {
                    response_body: ResponseBody {
                        text: TextBody { body },
                    },
                },
            },
        }
    }

    /// The response body text.
    pub fn body(&self) -> &str {
        &self.response.function_response.response_body.text.body
    }
}

/// Handles the agent's SQL tool invocations.
pub struct QueryAction {
    executor: QueryExecutor,
}

impl QueryAction {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// Handle one tool invocation.
    pub async fn handle(&self, request: &ActionRequest) -> ActionResponse {
        let sql = request
            .parameters
            .iter()
            .find(|p| p.name == SQL_PARAMETER)
            .map(|p| p.value.as_str())
            .unwrap_or("");

        let body = if sql.is_empty() {
            "Error: No SQL query provided.".to_string()
        } else {
            match self.executor.run(sql).await {
                Ok(table) => table,
                Err(QueryError::Rejected) => {
                    "Error: Only SELECT queries are permitted.".to_string()
                }
                Err(e) => {
                    error!(error = %e, "Query execution error");
                    format!("Error executing query: {}", e)
                }
            }
        };

        ActionResponse::text(request, body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::query::mock::MockQueryEngine;
    use crate::query::ExecutionState;

    fn request(sql: &str) -> ActionRequest {
        serde_json::from_value(serde_json::json!({
            "actionGroup": "AthenaQueryExecutor",
            "function": "execute_sql_query",
            "parameters": [{"name": "sql_query", "value": sql}]
        }))
        .unwrap()
    }

    fn action(engine: &Arc<MockQueryEngine>) -> QueryAction {
        let executor = QueryExecutor::new(engine.clone(), "analytics_test").with_limits(
            Duration::from_millis(1),
            Duration::from_millis(50),
            100,
        );
        QueryAction::new(executor)
    }

    #[tokio::test]
    async fn test_rejects_mutations() {
        let engine = Arc::new(MockQueryEngine::new());
        let action = action(&engine);
        for sql in [
            "INSERT INTO calls VALUES ('x')",
            "DELETE FROM calls WHERE call_id='123'",
            "DROP TABLE calls",
            "UPDATE calls SET agent_name='x'",
            "CREATE TABLE evil (id INT)",
        ] {
            let response = action.handle(&request(sql)).await;
            assert!(
                response.body().contains("Only SELECT queries"),
                "expected rejection for {:?}",
                sql
            );
        }
        assert!(engine.submissions().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_sql_parameter() {
        let engine = Arc::new(MockQueryEngine::new());
        let response = action(&engine)
            .handle(&ActionRequest {
                action_group: "AthenaQueryExecutor".to_string(),
                function: "execute_sql_query".to_string(),
                parameters: vec![],
            })
            .await;
        assert!(response.body().contains("No SQL query provided"));
    }

    #[tokio::test]
    async fn test_empty_sql_parameter() {
        let engine = Arc::new(MockQueryEngine::new());
        let response = action(&engine).handle(&request("")).await;
        assert!(response.body().contains("No SQL query provided"));
    }

    #[tokio::test]
    async fn test_successful_query_returns_table() {
        let engine = Arc::new(MockQueryEngine::new());
        engine.push_status(ExecutionState::Succeeded, None).await;
        engine
            .set_results(
                vec![
                    vec!["n".to_string()],
                    vec!["1".to_string()],
                ],
                false,
            )
            .await;

        let response = action(&engine).handle(&request("SELECT 1 AS n")).await;
        assert!(response.body().ends_with("(1 row returned)"));
        assert!(!response.body().contains("Error"));
    }

    #[tokio::test]
    async fn test_engine_failure_reported_as_text() {
        let engine = Arc::new(MockQueryEngine::new());
        engine
            .push_status(ExecutionState::Failed, Some("TABLE_NOT_FOUND: nope"))
            .await;

        let response = action(&engine).handle(&request("SELECT * FROM nope")).await;
        assert!(response.body().starts_with("Error executing query:"));
        assert!(response.body().contains("TABLE_NOT_FOUND"));
    }

    #[test]
    fn test_envelope_shape() {
        let response = ActionResponse::text(&request("SELECT 1"), "Hello world".to_string());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["messageVersion"], "1.0");
        assert_eq!(value["response"]["actionGroup"], "AthenaQueryExecutor");
        assert_eq!(value["response"]["function"], "execute_sql_query");
        assert_eq!(
            value["response"]["functionResponse"]["responseBody"]["TEXT"]["body"],
            "Hello world"
        );
    }
}
