//! End-to-end pipeline tests against in-memory backends.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use callscope::agent::action::{ActionRequest, QueryAction};
use callscope::ingest::{IngestService, StreamBatch};
use callscope::query::mock::MockQueryEngine;
use callscope::query::{ExecutionState, QueryExecutor};
use callscope::storage::mock::{MockAnalyticsStore, MockCatalog, MockTranscriptStore};

const CALLS_ARN: &str =
    "arn:aws:dynamodb:us-east-1:123456789012:table/calls-prod/stream/2026-01-01T00:00:00.000";
const SCORECARDS_ARN: &str =
    "arn:aws:dynamodb:us-east-1:123456789012:table/scorecards-prod/stream/2026-01-01T00:00:00.000";

fn call_event(call_id: &str) -> serde_json::Value {
    json!({
        "eventName": "INSERT",
        "eventSourceARN": CALLS_ARN,
        "dynamodb": {
            "NewImage": {
                "callId": {"S": call_id},
                "callTimestampUTC": {"S": "2026-02-11T10:30:00Z"},
                "payload": {"M": {
                    "agentId": {"S": "agent-7"},
                    "agentName": {"S": "Dana Cruz"},
                    "direction": {"S": "Outbound"},
                    "queueName": {"S": "Service Center"},
                    "siteId": {"N": "4"},
                    "tenantId": {"N": "11"},
                    "file_name": {"S": "rec-001.wav"}
                }}
            }
        }
    })
}

fn scorecard_event(guid: &str) -> serde_json::Value {
    json!({
        "eventName": "INSERT",
        "eventSourceARN": SCORECARDS_ARN,
        "dynamodb": {
            "NewImage": {
                "guid": {"S": guid},
                "datetime": {"S": "2026-02-11T14-30-00"},
                "agent": {"S": "Dana-Cruz"},
                "outcome": {"S": "resolved"},
                "overallScore": {"N": "2.5"},
                "scores": {"M": {
                    "urgency": {"M": {
                        "score": {"N": "2"},
                        "evidence": {"S": "Caller mentioned a deadline"}
                    }}
                }}
            }
        }
    })
}

#[tokio::test]
async fn ingest_end_to_end() {
    let store = Arc::new(MockAnalyticsStore::new());
    let catalog = Arc::new(MockCatalog::new());
    let transcripts = Arc::new(MockTranscriptStore::new());
    transcripts
        .insert(
            "rec-001.wav",
            MockTranscriptStore::transcript(63.8, &["spk_0", "spk_1"]),
        )
        .await;

    let service = IngestService::new(transcripts, store.clone(), catalog.clone());

    // One valid call, one call without an identifier, one scorecard
    let batch: StreamBatch = serde_json::from_value(json!({
        "Records": [call_event("call-1"), call_event(""), scorecard_event("sc-1")]
    }))
    .unwrap();

    let written = service.process_batch(&batch).await.unwrap();
    assert_eq!(written, 2);

    let writes = store.writes().await;
    assert_eq!(writes.len(), 2, "one write group per entity");

    let (call_key, call_body) = writes
        .iter()
        .find(|(k, _)| k.starts_with("calls/"))
        .expect("calls group written");
    assert!(call_key.starts_with("calls/year=2026/month=02/day=11/"));
    let call_line: serde_json::Value =
        serde_json::from_str(std::str::from_utf8(call_body).unwrap().lines().next().unwrap())
            .unwrap();
    assert_eq!(call_line["call_id"], "call-1");
    assert_eq!(call_line["call_duration_seconds"], 63);
    assert_eq!(call_line["answer_type"], "Human");
    assert!(call_line.get("year").is_none(), "partition lives in the key");

    let (scorecard_key, scorecard_body) = writes
        .iter()
        .find(|(k, _)| k.starts_with("scorecards/"))
        .expect("scorecards group written");
    assert!(scorecard_key.starts_with("scorecards/year=2026/month=02/day=11/"));
    let scorecard_line: serde_json::Value = serde_json::from_str(
        std::str::from_utf8(scorecard_body)
            .unwrap()
            .lines()
            .next()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(scorecard_line["guid"], "sc-1");
    assert_eq!(scorecard_line["score_urgency"], 2);
    assert_eq!(scorecard_line["score_ask_for_payment"], 0);

    // Each written group registered its partition
    assert_eq!(catalog.registered().await.len(), 2);
}

#[tokio::test]
async fn query_tool_end_to_end() {
    let engine = Arc::new(MockQueryEngine::new());
    engine.push_status(ExecutionState::Queued, None).await;
    engine.push_status(ExecutionState::Running, None).await;
    engine.push_status(ExecutionState::Succeeded, None).await;
    engine
        .set_results(
            vec![
                vec!["direction".to_string(), "total".to_string()],
                vec!["Outbound".to_string(), "37".to_string()],
                vec!["Inbound".to_string(), "12".to_string()],
            ],
            false,
        )
        .await;

    let executor = QueryExecutor::new(engine.clone(), "post_call_analytics").with_limits(
        Duration::from_millis(1),
        Duration::from_secs(1),
        100,
    );
    let action = QueryAction::new(executor);

    let request: ActionRequest = serde_json::from_value(json!({
        "actionGroup": "AthenaQueryExecutor",
        "function": "execute_sql_query",
        "parameters": [{
            "name": "sql_query",
            "value": "SELECT direction, COUNT(*) AS total FROM calls GROUP BY direction"
        }]
    }))
    .unwrap();

    let response = action.handle(&request).await;
    let body = response.body();
    assert!(body.contains("direction | total"));
    assert!(body.contains("Outbound  | 37"));
    assert!(body.ends_with("(2 rows returned)"));

    let envelope = serde_json::to_value(&response).unwrap();
    assert_eq!(envelope["messageVersion"], "1.0");
    assert_eq!(envelope["response"]["actionGroup"], "AthenaQueryExecutor");
}
