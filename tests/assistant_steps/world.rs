//! Shared world state for assistant turn scenarios.

use std::sync::Arc;

use atelier::agent::{Agent, AgentResult, TurnResponse};
use atelier::config::AgentConfig;
use atelier::model::adapters::ScriptedModelProvider;
use atelier::model::ports::ModelProvider;
use atelier::tools::WorkspaceToolbox;
use atelier::workflow::WorkflowEngine;
use atelier::workspace::adapters::{
    InMemoryDocProvider, InMemorySprintProvider, InMemoryTaskProvider,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Scenario world for assistant turn behaviour tests.
pub struct AssistantWorld {
    pub model: ScriptedModelProvider,
    pub tasks: InMemoryTaskProvider,
    pub docs: InMemoryDocProvider,
    pub sprints: InMemorySprintProvider,
    pub config: AgentConfig,
    pub agent: Option<Agent<DefaultClock>>,
    pub last_response: Option<AgentResult<TurnResponse>>,
}

impl AssistantWorld {
    /// Creates a world with an empty script and empty providers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: ScriptedModelProvider::new(),
            tasks: InMemoryTaskProvider::new(),
            docs: InMemoryDocProvider::new(),
            sprints: InMemorySprintProvider::new(),
            config: AgentConfig::default(),
            agent: None,
            last_response: None,
        }
    }

    /// Returns the agent, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error when the standard workflow roster cannot be built.
    pub fn agent(&mut self) -> Result<&mut Agent<DefaultClock>, eyre::Report> {
        if self.agent.is_none() {
            let model: Arc<dyn ModelProvider> = Arc::new(self.model.clone());
            let toolbox = WorkspaceToolbox::new(
                Arc::new(self.tasks.clone()),
                Arc::new(self.sprints.clone()),
                Arc::new(self.docs.clone()),
            );
            let engine = WorkflowEngine::standard(&model, &toolbox, &self.config)
                .map_err(|err| eyre::eyre!("build engine: {err}"))?;
            self.agent = Some(Agent::new(engine, self.config.clone(), Arc::new(DefaultClock)));
        }
        self.agent
            .as_mut()
            .ok_or_else(|| eyre::eyre!("agent missing after construction"))
    }

    /// Returns the last turn's response.
    ///
    /// # Errors
    ///
    /// Returns an error when no turn has run or the last turn failed.
    pub fn response(&self) -> Result<&TurnResponse, eyre::Report> {
        self.last_response
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no turn has run in this scenario"))?
            .as_ref()
            .map_err(|err| eyre::eyre!("turn failed: {err}"))
    }
}

impl Default for AssistantWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AssistantWorld {
    AssistantWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
