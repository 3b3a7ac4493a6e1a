//! Given steps for assistant turn scenarios.

use super::world::{AssistantWorld, run_async};
use atelier::model::domain::{ModelResponse, ToolCallRequest};
use atelier::workspace::domain::NewDocument;
use atelier::workspace::ports::DocProvider;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;

const TWO_REQUIREMENTS: &str = "## Requirement: Pantry inventory\nTrack pantry items.\n\n\
## Requirement: Recipe suggestions\nSuggest recipes from the pantry.\n";

#[given("a fresh conversation")]
fn fresh_conversation(world: &mut AssistantWorld) {
    world.agent = None;
    world.last_response = None;
}

#[given(r#"the model classifies the next message as "{intent}""#)]
fn model_classifies(world: &mut AssistantWorld, intent: String) {
    let reply = json!({ "intent": intent, "confidence": 0.9, "reasoning": "scenario" });
    world.model = world.model.clone().then_text(reply.to_string());
}

#[given(r#"the model replies with the interview question "{question}""#)]
fn model_asks(world: &mut AssistantWorld, question: String) {
    let reply = json!({
        "manifestUpdates": { "features": ["recipe search"] },
        "completedFields": [],
        "question": question,
    });
    world.model = world.model.clone().then_text(reply.to_string());
}

#[given(r#"the model keeps calling "{tool}""#)]
fn model_keeps_calling(world: &mut AssistantWorld, tool: String) {
    let call = ModelResponse::text("").with_tool_calls(vec![ToolCallRequest::new(
        "loop",
        tool,
        json!({}),
    )]);
    world.model = world.model.clone().repeating(call);
}

#[given(r#"a document "{title}" with two requirements"#)]
fn document_with_requirements(world: &mut AssistantWorld, title: String) -> Result<(), eyre::Report> {
    let payload = NewDocument::new(title, TWO_REQUIREMENTS).wrap_err("build document payload")?;
    run_async(world.docs.create(&payload)).wrap_err("seed document")?;
    Ok(())
}

#[given("the model compiles the document into a high and a low complexity task")]
fn model_compiles(world: &mut AssistantWorld) {
    let call = ModelResponse::text("").with_tool_calls(vec![ToolCallRequest::new(
        "compile",
        "compile_document",
        json!({ "docId": "doc-1" }),
    )]);
    let compiled = json!({
        "tasks": [
            { "title": "Pantry inventory", "description": "Track items.", "acceptanceCriteria": ["Items persist"], "estimatedComplexity": "high" },
            { "title": "Recipe suggestions", "description": "Rank recipes.", "acceptanceCriteria": ["Pantry items rank first"], "estimatedComplexity": "low" }
        ],
        "warnings": []
    });
    world.model = world
        .model
        .clone()
        .then_respond(call)
        .then_text(compiled.to_string())
        .then_text("Created two tasks.");
}
