//! Shared harness for end-to-end turn tests.

use async_trait::async_trait;
use atelier::agent::Agent;
use atelier::config::AgentConfig;
use atelier::conversation::domain::AgentState;
use atelier::model::adapters::ScriptedModelProvider;
use atelier::model::domain::{ModelResponse, ToolCallRequest};
use atelier::model::ports::ModelProvider;
use atelier::tools::WorkspaceToolbox;
use atelier::workflow::WorkflowEngine;
use atelier::workspace::adapters::{
    InMemoryDocProvider, InMemorySprintProvider, InMemoryTaskProvider,
};
use atelier::workspace::domain::{EntityId, NewTask, Task, TaskFilter, TaskPatch, TaskUpdate};
use atelier::workspace::ports::{TaskProvider, WorkspaceProviderError, WorkspaceResult};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::io;
use std::sync::Arc;

/// An agent wired to in-memory providers, with handles to inspect them.
pub struct Harness {
    pub agent: Agent<DefaultClock>,
    pub model: ScriptedModelProvider,
    pub tasks: InMemoryTaskProvider,
    pub docs: InMemoryDocProvider,
    pub sprints: InMemorySprintProvider,
}

impl Harness {
    /// Builds a harness for a fresh conversation.
    pub fn new(model: ScriptedModelProvider) -> Self {
        Self::with_state(model, AgentState::new())
    }

    /// Builds a harness that resumes `state`.
    pub fn with_state(model: ScriptedModelProvider, state: AgentState) -> Self {
        let tasks = InMemoryTaskProvider::new();
        let docs = InMemoryDocProvider::new();
        let sprints = InMemorySprintProvider::new();
        let toolbox = WorkspaceToolbox::new(
            Arc::new(tasks.clone()),
            Arc::new(sprints.clone()),
            Arc::new(docs.clone()),
        );
        let agent = build_agent(&model, &toolbox, state);
        Self {
            agent,
            model,
            tasks,
            docs,
            sprints,
        }
    }
}

/// Builds an agent over an arbitrary toolbox.
pub fn build_agent(
    model: &ScriptedModelProvider,
    toolbox: &WorkspaceToolbox,
    state: AgentState,
) -> Agent<DefaultClock> {
    let shared: Arc<dyn ModelProvider> = Arc::new(model.clone());
    let config = AgentConfig::default();
    let engine = WorkflowEngine::standard(&shared, toolbox, &config).expect("standard engine");
    Agent::from_state(state, engine, config, Arc::new(DefaultClock))
}

/// The classifier's reply for `label`.
pub fn classified_as(label: &str) -> String {
    json!({ "intent": label, "confidence": 0.92, "reasoning": "scripted" }).to_string()
}

/// A model reply requesting the given tool calls.
pub fn calling(calls: &[(&str, &str, Value)]) -> ModelResponse {
    ModelResponse::text("").with_tool_calls(
        calls
            .iter()
            .map(|(id, name, arguments)| ToolCallRequest::new(*id, *name, arguments.clone()))
            .collect(),
    )
}

/// A task provider whose every operation fails.
pub struct FailingTaskProvider;

fn offline() -> WorkspaceProviderError {
    WorkspaceProviderError::unavailable(io::Error::other("task board offline"))
}

#[async_trait]
impl TaskProvider for FailingTaskProvider {
    async fn create(&self, _task: &NewTask) -> WorkspaceResult<Task> {
        Err(offline())
    }

    async fn update(&self, _id: &EntityId, _patch: &TaskPatch) -> WorkspaceResult<Task> {
        Err(offline())
    }

    async fn batch_update(&self, _updates: &[TaskUpdate]) -> WorkspaceResult<Vec<Task>> {
        Err(offline())
    }

    async fn list(&self, _filter: &TaskFilter) -> WorkspaceResult<Vec<Task>> {
        Err(offline())
    }

    async fn get_by_id(&self, _id: &EntityId) -> WorkspaceResult<Option<Task>> {
        Err(offline())
    }
}
