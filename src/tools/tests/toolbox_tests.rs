//! Tool calls against in-memory workspace providers.

use crate::external::CallGuard;
use crate::tools::{ToolError, ToolName, WorkspaceToolbox};
use crate::workspace::adapters::{InMemoryDocProvider, InMemorySprintProvider, InMemoryTaskProvider};
use crate::workspace::domain::{EntityId, EntityKind};
use crate::workspace::ports::{SprintProvider, WorkspaceProviderError};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[fixture]
fn toolbox() -> WorkspaceToolbox {
    WorkspaceToolbox::new(
        Arc::new(InMemoryTaskProvider::new()),
        Arc::new(InMemorySprintProvider::new()),
        Arc::new(InMemoryDocProvider::new()),
    )
}

#[fixture]
fn guard() -> CallGuard {
    CallGuard::new(CancellationToken::new(), Duration::from_secs(5))
}

fn parse(raw: &str) -> Value {
    serde_json::from_str(raw).expect("tool output is JSON")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_reports_the_new_id(toolbox: WorkspaceToolbox, guard: CallGuard) {
    let raw = toolbox
        .call(
            ToolName::CreateTask,
            &json!({ "title": "Write onboarding doc", "priority": "high" }),
            &guard,
        )
        .await
        .expect("tool succeeds");

    let result = parse(&raw);
    assert_eq!(result["success"], true);
    assert_eq!(result["taskId"], "task-1");
    assert_eq!(result["task"]["priority"], "high");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bad_arguments_are_reported_not_raised(toolbox: WorkspaceToolbox, guard: CallGuard) {
    let raw = toolbox
        .call(ToolName::CreateTask, &json!({ "title": "  " }), &guard)
        .await
        .expect("argument errors are returned as JSON");

    let result = parse(&raw);
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().is_some_and(|err| !err.is_empty()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn string_encoded_arguments_are_accepted(toolbox: WorkspaceToolbox, guard: CallGuard) {
    let raw = toolbox
        .call(
            ToolName::CreateSprint,
            &Value::String(r#"{"name": "Sprint 1", "goal": "Ship beta"}"#.to_owned()),
            &guard,
        )
        .await
        .expect("tool succeeds");

    assert_eq!(parse(&raw)["sprintId"], "sprint-1");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_document_is_a_provider_error(toolbox: WorkspaceToolbox, guard: CallGuard) {
    let err = toolbox
        .call(ToolName::ReadDocument, &json!({ "docId": "doc-404" }), &guard)
        .await
        .expect_err("document does not exist");

    assert!(matches!(
        err,
        ToolError::Provider(WorkspaceProviderError::NotFound { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn compile_requires_a_configured_compiler(toolbox: WorkspaceToolbox, guard: CallGuard) {
    let err = toolbox
        .call(ToolName::CompileDocument, &json!({ "docId": "doc-1" }), &guard)
        .await
        .expect_err("no compiler configured");

    assert!(matches!(err, ToolError::Unsupported(ToolName::CompileDocument)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planning_unknown_tasks_changes_nothing(guard: CallGuard) {
    let sprints = InMemorySprintProvider::new();
    let toolbox = WorkspaceToolbox::new(
        Arc::new(InMemoryTaskProvider::new()),
        Arc::new(sprints.clone()),
        Arc::new(InMemoryDocProvider::new()),
    );
    toolbox
        .call(ToolName::CreateSprint, &json!({ "name": "Sprint 1" }), &guard)
        .await
        .expect("sprint created");

    let err = toolbox
        .call(
            ToolName::PlanSprint,
            &json!({ "sprintId": "sprint-1", "taskIds": ["task-99"] }),
            &guard,
        )
        .await
        .expect_err("task does not exist");

    assert!(matches!(
        err,
        ToolError::Provider(WorkspaceProviderError::NotFound {
            kind: EntityKind::Task,
            ..
        })
    ));
    let sprint = sprints
        .get_by_id(&EntityId::new("sprint-1").expect("valid id"))
        .await
        .expect("lookup succeeds")
        .expect("sprint exists");
    assert!(sprint.task_ids.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planned_tasks_are_listed_under_their_sprint(toolbox: WorkspaceToolbox, guard: CallGuard) {
    toolbox
        .call(ToolName::CreateTask, &json!({ "title": "Pantry scanner" }), &guard)
        .await
        .expect("task created");
    toolbox
        .call(ToolName::CreateSprint, &json!({ "name": "Sprint 1" }), &guard)
        .await
        .expect("sprint created");

    let planned = parse(
        &toolbox
            .call(
                ToolName::PlanSprint,
                &json!({ "sprintId": "sprint-1", "taskIds": ["task-1"] }),
                &guard,
            )
            .await
            .expect("planning succeeds"),
    );
    let listed = parse(
        &toolbox
            .call(ToolName::ListTasks, &json!({ "sprintId": "sprint-1" }), &guard)
            .await
            .expect("listing succeeds"),
    );

    assert_eq!(planned["sprint"]["taskIds"], json!(["task-1"]));
    assert_eq!(listed["tasks"][0]["id"], "task-1");
    assert_eq!(listed["tasks"][0]["sprintId"], "sprint-1");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planning_into_a_missing_sprint_fails(toolbox: WorkspaceToolbox, guard: CallGuard) {
    let err = toolbox
        .call(
            ToolName::PlanSprint,
            &json!({ "sprintId": "sprint-9", "taskIds": [] }),
            &guard,
        )
        .await
        .expect_err("sprint does not exist");

    assert!(matches!(
        err,
        ToolError::Provider(WorkspaceProviderError::NotFound {
            kind: EntityKind::Sprint,
            ..
        })
    ));
}
