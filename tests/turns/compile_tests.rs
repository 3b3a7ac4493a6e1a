//! Document compilation driven through the compiling workflow.

use super::helpers::{Harness, calling, classified_as};
use atelier::model::adapters::ScriptedModelProvider;
use atelier::workflow::WorkflowKind;
use atelier::workspace::domain::{EntityKind, NewDocument, TaskFilter, TaskPriority};
use atelier::workspace::ports::{DocProvider, TaskProvider};
use rstest::rstest;
use serde_json::json;

const REQUIREMENTS_DOC: &str = "# Larder MVP

## Requirement: Pantry inventory
Users record what is in their pantry.

## Requirement: Recipe suggestions
Suggest recipes that use pantry items first.
";

fn compiled_tasks() -> String {
    let tasks = json!({
        "tasks": [
            {
                "title": "Pantry inventory",
                "description": "Let users add, edit and remove pantry items.",
                "acceptanceCriteria": ["Items persist across sessions", "Quantities can be edited"],
                "estimatedComplexity": "high",
                "dependencies": []
            },
            {
                "title": "Recipe suggestions",
                "description": "Rank recipes by pantry coverage.",
                "acceptanceCriteria": ["Recipes using pantry items rank first"],
                "estimatedComplexity": "low",
                "dependencies": ["Pantry inventory"]
            }
        ],
        "warnings": []
    });
    format!("```json\n{tasks}\n```")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn two_requirements_become_two_prioritised_tasks() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("compile"))
        .then_respond(calling(&[(
            "c1",
            "compile_document",
            json!({ "docId": "doc-1" }),
        )]))
        .then_text(compiled_tasks())
        .then_text("Created 2 tasks from the MVP document.");
    let mut harness = Harness::new(model);
    harness
        .docs
        .create(&NewDocument::new("Larder MVP", REQUIREMENTS_DOC).expect("valid document"))
        .await
        .expect("seed document");

    let response = harness
        .agent
        .handle_message("turn the MVP doc into tasks")
        .await
        .expect("compile turn");

    assert_eq!(response.workflow, WorkflowKind::Compiling);
    let tasks = harness
        .tasks
        .list(&TaskFilter::default())
        .await
        .expect("list tasks");
    assert_eq!(tasks.len(), 2);
    let priorities: Vec<TaskPriority> = tasks.iter().map(|task| task.priority).collect();
    assert_eq!(priorities, vec![TaskPriority::High, TaskPriority::Low]);
    assert!(
        tasks
            .iter()
            .all(|task| task.description.contains("## Acceptance Criteria\n- [ ] "))
    );

    assert_eq!(response.artifacts.len(), 2);
    assert!(
        response
            .artifacts
            .iter()
            .all(|artifact| artifact.kind == EntityKind::Task)
    );
    let remembered = harness
        .agent
        .state()
        .workflow()
        .map(|workflow| workflow.created_entities().len());
    assert_eq!(remembered, Some(2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unparseable_compiler_output_is_reported_without_tasks() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("compile"))
        .then_respond(calling(&[(
            "c1",
            "compile_document",
            json!({ "docId": "doc-1" }),
        )]))
        .then_text("Sorry, I could not read that document.")
        .then_text("Compilation failed; the document may need clearer requirements.");
    let mut harness = Harness::new(model);
    harness
        .docs
        .create(&NewDocument::new("Notes", "loose thoughts").expect("valid document"))
        .await
        .expect("seed document");

    let response = harness
        .agent
        .handle_message("compile my notes")
        .await
        .expect("turn still completes");

    let observation = response.observations.first().expect("observation");
    assert!(observation.text.contains("Sorry, I could not read that document."));
    let tasks = harness
        .tasks
        .list(&TaskFilter::default())
        .await
        .expect("list tasks");
    assert!(tasks.is_empty());
}
