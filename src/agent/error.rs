//! Errors surfaced by the agent.

use crate::conversation::domain::ExecutionId;
use crate::external::CallError;
use crate::workflow::WorkflowError;
use thiserror::Error;

/// Errors that fail a turn. State is left as it was before the turn.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// The turn was cancelled or an external call timed out.
    #[error(transparent)]
    Call(#[from] CallError),

    /// The selected workflow failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// No pending execution carries this id.
    #[error("no pending execution with id {0}")]
    UnknownExecution(ExecutionId),

    /// The session task has stopped.
    #[error("agent session is closed")]
    SessionClosed,
}

impl AgentError {
    /// Returns `true` when the error represents cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        match self {
            Self::Call(err) => err.is_cancelled(),
            Self::Workflow(err) => err.is_cancelled(),
            Self::UnknownExecution(_) | Self::SessionClosed => false,
        }
    }
}

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
