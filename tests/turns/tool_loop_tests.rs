//! The bounded tool loop as seen through whole turns.

use super::helpers::{FailingTaskProvider, Harness, build_agent, calling, classified_as};
use atelier::conversation::domain::AgentState;
use atelier::extraction::extract_suggestions;
use atelier::model::adapters::ScriptedModelProvider;
use atelier::model::domain::ModelResponse;
use atelier::tools::{ToolOutcome, WorkspaceToolbox};
use atelier::workflow::{LoopTermination, STEP_LIMIT_MESSAGE};
use atelier::workspace::adapters::{InMemoryDocProvider, InMemorySprintProvider};
use atelier::workspace::domain::NewTask;
use atelier::workspace::ports::TaskProvider;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reply_without_tool_calls_ends_after_one_step() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("query"))
        .then_respond(ModelResponse::text("There are no tasks yet.").with_tool_calls(Vec::new()));
    let mut harness = Harness::new(model);

    let response = harness
        .agent
        .handle_message("what is on the board?")
        .await
        .expect("turn");

    assert_eq!(harness.model.invocation_count(), 2);
    assert!(response.observations.is_empty());
    assert!(response.artifacts.is_empty());
    assert_eq!(response.termination, LoopTermination::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn endless_tool_calls_end_at_the_step_limit() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("execute"))
        .repeating(calling(&[("call", "list_tasks", json!({}))]));
    let mut harness = Harness::new(model);
    let max_steps = harness.agent.config().max_steps;

    let response = harness
        .agent
        .handle_message("keep checking the board")
        .await
        .expect("limit is a normal reply");

    assert_eq!(harness.model.invocation_count(), max_steps + 1);
    assert_eq!(response.termination, LoopTermination::StepLimitReached);
    assert_eq!(response.content, STEP_LIMIT_MESSAGE);
    assert_eq!(response.observations.len(), max_steps);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_entity_yields_one_artifact_with_latest_value() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("execute"))
        .then_respond(calling(&[
            ("c1", "update_task", json!({ "taskId": "task-1", "title": "Draft schema" })),
            ("c2", "update_task", json!({ "taskId": "task-1", "title": "Final schema" })),
        ]))
        .then_text("Renamed it twice.");
    let mut harness = Harness::new(model);
    harness
        .tasks
        .create(&NewTask::new("Schema").expect("valid task"))
        .await
        .expect("seed task");

    let response = harness
        .agent
        .handle_message("rename the schema task")
        .await
        .expect("turn");

    assert_eq!(response.artifacts.len(), 1);
    let artifact = response.artifacts.first().expect("one artifact");
    assert_eq!(artifact.id.as_str(), "task-1");
    assert_eq!(artifact.title, "Final schema");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_provider_becomes_an_observation() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("execute"))
        .then_respond(calling(&[("c1", "create_task", json!({ "title": "Pantry" }))]))
        .then_text("The task board is unavailable right now.");
    let toolbox = WorkspaceToolbox::new(
        Arc::new(FailingTaskProvider),
        Arc::new(InMemorySprintProvider::new()),
        Arc::new(InMemoryDocProvider::new()),
    );
    let mut agent = build_agent(&model, &toolbox, AgentState::new());

    let response = agent.handle_message("add a pantry task").await.expect("turn");

    let observation = response.observations.first().expect("one observation");
    assert_eq!(observation.outcome, ToolOutcome::Failed);
    assert!(observation.text.contains("task board offline"));
    assert!(response.artifacts.is_empty());
    let follow_up = model.requests().into_iter().last().expect("second loop step");
    let fed_back = follow_up.messages.last().expect("observation message");
    assert!(fed_back.content.contains("task board offline"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn suggestions_are_lifted_out_of_the_reply() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("idea"))
        .then_text(
            "A shopping list export would fit well.\n<suggestions>[{\"label\": \"Capture it\", \"text\": \"Add it as a task\"}]</suggestions>",
        );
    let mut harness = Harness::new(model);

    let response = harness
        .agent
        .handle_message("what about exporting lists?")
        .await
        .expect("turn");

    assert_eq!(response.content, "A shopping list export would fit well.");
    assert_eq!(response.suggested_actions.len(), 1);
    let again = extract_suggestions(&response.content);
    assert_eq!(again.content, response.content);
    assert!(again.actions.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_entities_are_listed_in_later_prompts() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("execute"))
        .then_respond(calling(&[("c1", "create_task", json!({ "title": "Pantry sync" }))]))
        .then_text("Created.")
        .then_text(classified_as("query"))
        .then_text("It is task-1.");
    let mut harness = Harness::new(model);

    harness.agent.handle_message("add pantry sync").await.expect("first");
    harness
        .agent
        .handle_message("what was the id?")
        .await
        .expect("second");

    let last = harness.model.requests().into_iter().last().expect("request");
    let system = last.messages.first().expect("system prompt");
    assert!(system.content.contains("task-1: Pantry sync"));
}
