//! The workflow trait and the ordered registry used for dispatch.

use super::{TurnContext, WorkflowError, WorkflowOutput};
use crate::config::ConfigError;
use crate::conversation::domain::{AgentState, Mode};
use crate::intent::Intent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Identifies a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Manifest interview.
    Interview,
    /// Questions about the workspace.
    Query,
    /// Brainstorming.
    Idea,
    /// Document writing.
    Documenting,
    /// Document compilation.
    Compiling,
    /// Sprint planning.
    Planning,
    /// Progress review.
    Analyzing,
    /// General execution; the fallback.
    Execution,
}

impl WorkflowKind {
    /// Returns the snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interview => "interview",
            Self::Query => "query",
            Self::Idea => "idea",
            Self::Documenting => "documenting",
            Self::Compiling => "compiling",
            Self::Planning => "planning",
            Self::Analyzing => "analyzing",
            Self::Execution => "execution",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handler specialised to one conversational purpose.
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Returns the workflow's identity.
    fn kind(&self) -> WorkflowKind;

    /// Returns the mode the engine enters after this workflow runs.
    fn mode(&self) -> Mode;

    /// Returns `true` when this workflow should handle `intent` in `mode`.
    fn supports(&self, intent: Intent, mode: Mode) -> bool;

    /// Handles the turn, mutating the draft state.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the turn cannot complete.
    async fn execute(
        &self,
        state: &mut AgentState,
        turn: &TurnContext<'_>,
    ) -> Result<WorkflowOutput, WorkflowError>;
}

/// The standard acceptance rule: a workflow takes its own intent, and keeps
/// an ambiguous turn while the engine is already in its mode.
#[must_use]
pub fn accepts(own_intent: Intent, own_mode: Mode, intent: Intent, mode: Mode) -> bool {
    intent == own_intent || (intent == Intent::Unclear && mode == own_mode)
}

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two workflows share a kind.
    #[error("workflow {0} registered twice")]
    DuplicateKind(WorkflowKind),

    /// The limits the roster would be built with are out of range.
    #[error("invalid agent configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Collects workflows in dispatch order.
#[derive(Default)]
pub struct WorkflowRegistryBuilder {
    routes: Vec<Arc<dyn Workflow>>,
}

impl WorkflowRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a workflow; earlier routes take precedence.
    #[must_use]
    pub fn route(mut self, workflow: Arc<dyn Workflow>) -> Self {
        self.routes.push(workflow);
        self
    }

    /// Finishes the registry with `fallback` as the final, unconditional
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateKind`] when two workflows, the
    /// fallback included, share a kind.
    pub fn build(self, fallback: Arc<dyn Workflow>) -> Result<WorkflowRegistry, RegistryError> {
        let mut seen = vec![fallback.kind()];
        for workflow in &self.routes {
            let kind = workflow.kind();
            if seen.contains(&kind) {
                return Err(RegistryError::DuplicateKind(kind));
            }
            seen.push(kind);
        }
        Ok(WorkflowRegistry {
            routes: self.routes,
            fallback,
        })
    }
}

/// An ordered set of workflows ending in exactly one fallback.
#[derive(Clone)]
pub struct WorkflowRegistry {
    routes: Vec<Arc<dyn Workflow>>,
    fallback: Arc<dyn Workflow>,
}

impl WorkflowRegistry {
    /// Selects the first route supporting `intent` in `mode`, or the
    /// fallback.
    ///
    /// Selection depends only on the registry order and its arguments.
    #[must_use]
    pub fn select(&self, intent: Intent, mode: Mode) -> &dyn Workflow {
        self.routes
            .iter()
            .find(|workflow| workflow.supports(intent, mode))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Returns the workflow kinds in dispatch order, fallback last.
    #[must_use]
    pub fn kinds(&self) -> Vec<WorkflowKind> {
        self.routes
            .iter()
            .chain(std::iter::once(&self.fallback))
            .map(|workflow| workflow.kind())
            .collect()
    }
}
