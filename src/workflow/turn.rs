//! Per-turn inputs and outputs shared by every workflow.

use crate::context::ContextError;
use crate::conversation::domain::{Artifact, SuggestedAction};
use crate::external::{CallError, CallGuard};
use crate::intent::Intent;
use crate::model::ports::ModelError;
use crate::tools::ToolObservation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a workflow needs to know about the turn it is handling.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    /// The user's input for this turn.
    pub input: &'a str,
    /// The intent the turn was dispatched with.
    pub intent: Intent,
    /// Guard applied to every external call.
    pub guard: &'a CallGuard,
    /// Timestamp used for entities recorded during the turn.
    pub now: DateTime<Utc>,
}

/// How a workflow's loop ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopTermination {
    /// The model produced a final reply.
    #[default]
    Completed,
    /// The step limit was reached before a final reply.
    StepLimitReached,
}

/// The result of one workflow execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowOutput {
    /// User-visible reply.
    pub content: String,
    /// Artifacts, unique by id.
    pub artifacts: Vec<Artifact>,
    /// Suggested follow-ups.
    pub suggested_actions: Vec<SuggestedAction>,
    /// Observations from every tool call, in execution order.
    pub observations: Vec<ToolObservation>,
    /// How the workflow finished.
    pub termination: LoopTermination,
    /// Number of model invocations the workflow made.
    pub model_invocations: usize,
}

/// Errors that abort a workflow.
#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    /// The turn was cancelled, or a call timed out.
    #[error(transparent)]
    Call(#[from] CallError),

    /// The model call failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The prompt could not be rendered.
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl WorkflowError {
    /// Returns `true` when the error represents cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Call(CallError::Cancelled))
    }
}
