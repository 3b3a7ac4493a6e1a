//! What a turn hands back to the caller.

use crate::conversation::domain::{Artifact, ExecutionId, Mode, SuggestedAction};
use crate::intent::{Intent, IntentClassification};
use crate::tools::ToolObservation;
use crate::workflow::{LoopTermination, WorkflowKind};

/// The reply to one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResponse {
    /// User-visible reply, with any suggestions block removed.
    pub content: String,
    /// Tasks, documents and sprints touched during the turn, unique by id.
    pub artifacts: Vec<Artifact>,
    /// Quick replies offered alongside the content.
    pub suggested_actions: Vec<SuggestedAction>,
    /// Intent the turn was dispatched with.
    pub intent: Intent,
    /// Workflow that handled the turn.
    pub workflow: WorkflowKind,
    /// Mode after the turn.
    pub mode: Mode,
    /// Tool call outcomes, in execution order.
    pub observations: Vec<ToolObservation>,
    /// How the workflow finished.
    pub termination: LoopTermination,
}

/// The first half of a confirm-before-run exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingIntent {
    /// How the input was classified.
    pub classification: IntentClassification,
    /// Id to pass to `execute_pending`.
    pub execution_id: ExecutionId,
    /// A ready-made action that confirms the execution.
    pub action: SuggestedAction,
}
