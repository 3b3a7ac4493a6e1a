//! Confirm-before-run executions and cancellation.

use super::helpers::{Harness, calling, classified_as};
use atelier::agent::AgentError;
use atelier::conversation::domain::{ActionKind, ExecutionId};
use atelier::external::CallError;
use atelier::intent::Intent;
use atelier::model::adapters::ScriptedModelProvider;
use atelier::workspace::domain::TaskFilter;
use atelier::workspace::ports::TaskProvider;
use rstest::rstest;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn detected_intent_runs_only_when_confirmed() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("execute"))
        .then_respond(calling(&[("c1", "create_task", json!({ "title": "Barcode scan" }))]))
        .then_text("Added the barcode task.");
    let mut harness = Harness::new(model);

    let pending = harness
        .agent
        .detect_intent("add a barcode scanning task")
        .await
        .expect("detect");
    let before = harness
        .tasks
        .list(&TaskFilter::default())
        .await
        .expect("list");
    assert!(before.is_empty());
    assert_eq!(pending.action.kind, ActionKind::ExecutePending);
    assert_eq!(
        pending.action.payload,
        json!({ "executionId": pending.execution_id.to_string() })
    );

    let response = harness
        .agent
        .execute_pending(pending.execution_id)
        .await
        .expect("execute");

    assert_eq!(response.intent, Intent::Execute);
    assert_eq!(response.artifacts.len(), 1);
    assert!(harness.agent.state().pending().is_none());
    let history = harness.agent.state().history();
    assert_eq!(
        history.first().map(|message| message.content()),
        Some("add a barcode scanning task")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_execution_id_is_an_error() {
    let mut harness = Harness::new(ScriptedModelProvider::new());
    let stray = ExecutionId::new();

    let result = harness.agent.execute_pending(stray).await;

    assert!(matches!(result, Err(AgentError::UnknownExecution(id)) if id == stray));
    assert_eq!(harness.model.invocation_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_turn_commits_nothing() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("interview"))
        .then_text(r#"{"manifestUpdates": {"name": "Larder"}, "completedFields": ["name"]}"#);
    let mut harness = Harness::new(model);
    let before = harness.agent.snapshot();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = harness
        .agent
        .handle_message_with("It's called Larder", cancel)
        .await;

    assert!(matches!(result, Err(AgentError::Call(CallError::Cancelled))));
    assert!(result.as_ref().is_err_and(AgentError::is_cancelled));
    assert_eq!(harness.agent.snapshot(), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_confirmation_keeps_the_execution_pending() {
    let model = ScriptedModelProvider::new().then_text(classified_as("plan"));
    let mut harness = Harness::new(model);
    let pending = harness.agent.detect_intent("plan a sprint").await.expect("detect");

    let result = harness.agent.execute_pending(pending.execution_id).await;

    assert!(matches!(result, Err(AgentError::Workflow(_))));
    assert_eq!(
        harness.agent.state().pending().map(|found| found.execution_id),
        Some(pending.execution_id)
    );
}
