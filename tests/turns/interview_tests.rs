//! Interview turns and manifest completeness.

use super::helpers::{Harness, classified_as};
use atelier::conversation::domain::{AgentState, Mode};
use atelier::manifest::domain::{ManifestField, ProjectManifest, ProjectPhase};
use atelier::model::adapters::ScriptedModelProvider;
use atelier::workflow::WorkflowKind;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn nearly_complete() -> ProjectManifest {
    let mut manifest = ProjectManifest::new();
    manifest.name = "Larder".to_owned();
    manifest.mission = "Help home cooks waste less food".to_owned();
    manifest.target_users = vec!["home cooks".to_owned()];
    manifest.tech_stack = vec!["Rust".to_owned()];
    manifest.phase = Some(ProjectPhase::Build);
    manifest.features = vec!["pantry tracking".to_owned()];
    manifest.brand_voice = "warm and practical".to_owned();
    manifest.success_metrics = vec!["weekly active households".to_owned()];
    manifest
}

#[rstest]
fn eight_of_nine_fields_scores_89(nearly_complete: ProjectManifest) {
    let state = AgentState::with_manifest(nearly_complete);

    assert_eq!(state.missing_info(), &[ManifestField::Competitors]);
    assert_eq!(state.manifest().completeness_score(), 89);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_project_enters_interview_mode() {
    let reply = json!({
        "manifestUpdates": { "features": ["recipe search"] },
        "completedFields": [],
        "question": "What should the app be called?",
        "suggestions": [{ "label": "Name it later", "text": "Let's pick a name later" }]
    });
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("interview"))
        .then_text(reply.to_string());
    let mut harness = Harness::new(model);

    let response = harness
        .agent
        .handle_message("Let's build a recipe app")
        .await
        .expect("interview turn");

    let state = harness.agent.state();
    assert_eq!(response.workflow, WorkflowKind::Interview);
    assert_eq!(state.mode(), Mode::Interview);
    assert!(!state.missing_info().is_empty());
    assert!(state.manifest().completeness_score() < 100);
    assert_eq!(response.content, "What should the app be called?");
    assert_eq!(response.suggested_actions.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_fields_never_reappear() {
    let first = json!({
        "manifestUpdates": { "name": "Larder", "mission": "Cook from the pantry" },
        "completedFields": ["name", "mission"],
        "question": "Who is it for?"
    });
    let second = json!({
        "manifestUpdates": { "targetUsers": ["students"] },
        "completedFields": [],
        "question": "What stack?"
    });
    let model = ScriptedModelProvider::new()
        .then_text(classified_as("interview"))
        .then_text(first.to_string())
        .then_text(classified_as("unclear"))
        .then_text(second.to_string());
    let mut harness = Harness::new(model);

    harness.agent.handle_message("It's called Larder").await.expect("first");
    let after_first = harness.agent.state().missing_info().to_vec();
    let response = harness.agent.handle_message("students").await.expect("second");
    let after_second = harness.agent.state().missing_info();

    assert_eq!(response.workflow, WorkflowKind::Interview);
    assert!(!after_second.contains(&ManifestField::Name));
    assert!(!after_second.contains(&ManifestField::Mission));
    assert!(after_second.iter().all(|field| after_first.contains(field)));
    assert_eq!(harness.agent.state().manifest().target_users, vec!["students"]);
}
