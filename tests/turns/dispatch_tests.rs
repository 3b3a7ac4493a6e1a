//! Workflow selection across turns.

use super::helpers::{Harness, classified_as};
use atelier::conversation::domain::Mode;
use atelier::intent::Intent;
use atelier::model::adapters::ScriptedModelProvider;
use atelier::workflow::WorkflowKind;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ambiguous_follow_up_stays_with_the_current_workflow() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("plan"))
        .then_text("Which tasks should go into the sprint?")
        .then_text(classified_as("unclear"))
        .then_text("Added them.");
    let mut harness = Harness::new(model);

    let first = harness
        .agent
        .handle_message("plan the next sprint")
        .await
        .expect("first");
    let second = harness.agent.handle_message("those ones").await.expect("second");

    assert_eq!(first.workflow, WorkflowKind::Planning);
    assert_eq!(second.workflow, WorkflowKind::Planning);
    assert_eq!(second.intent, Intent::Unclear);
    assert_eq!(harness.agent.state().mode(), Mode::Planning);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ambiguous_turn_from_idle_falls_back_to_execution() {
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("unclear"))
        .then_text("Could you say a bit more?");
    let mut harness = Harness::new(model);

    let response = harness.agent.handle_message("hmm").await.expect("turn");

    assert_eq!(response.workflow, WorkflowKind::Execution);
    assert_eq!(response.mode, Mode::Executing);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unparseable_classification_defaults_to_query() {
    let model = ScriptedModelProvider::new()
        .then_text("I think they want a list")
        .then_text("Here is the list.");
    let mut harness = Harness::new(model);

    let response = harness.agent.handle_message("tasks?").await.expect("turn");

    assert_eq!(response.intent, Intent::DEFAULT);
    assert_eq!(response.workflow, WorkflowKind::Query);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unparseable_classification_mid_interview_keeps_interviewing() {
    let question = |text: &str| json!({ "question": text }).to_string();
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("interview"))
        .then_text(question("What is the project called?"))
        .then_text("no idea what they mean")
        .then_text(question("Who is it for?"));
    let mut harness = Harness::new(model);

    harness
        .agent
        .handle_message("let's start a new project")
        .await
        .expect("first");
    let second = harness.agent.handle_message("Larder").await.expect("second");

    assert_eq!(second.intent, Intent::Unclear);
    assert_eq!(second.workflow, WorkflowKind::Interview);
    assert_eq!(harness.agent.state().mode(), Mode::Interview);
}

#[rstest]
fn selection_depends_only_on_intent_and_mode() {
    let harness = Harness::new(ScriptedModelProvider::new());
    let registry = harness_registry(&harness);
    let modes = [Mode::Idle, Mode::Interview, Mode::Planning, Mode::Executing];

    for intent in Intent::ALL {
        for mode in modes {
            let first = registry.select(intent, mode).kind();
            let second = registry.select(intent, mode).kind();
            assert_eq!(first, second, "{intent} in {mode}");
        }
    }
}

fn harness_registry(harness: &Harness) -> atelier::workflow::WorkflowRegistry {
    harness.agent.engine().registry().clone()
}
