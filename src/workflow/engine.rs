//! Classification followed by registry dispatch.

use super::{TurnContext, WorkflowError, WorkflowKind, WorkflowOutput, WorkflowRegistry};
use crate::conversation::domain::{AgentState, Mode};
use crate::external::{CallError, CallGuard};
use crate::intent::{Intent, IntentClassification, IntentClassifier};
use tracing::{info, instrument};

/// The outcome of dispatching one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    /// The workflow that handled the turn.
    pub kind: WorkflowKind,
    /// The mode the engine is in afterwards.
    pub mode: Mode,
    /// What the workflow produced.
    pub output: WorkflowOutput,
}

/// Routes turns to workflows.
#[derive(Clone)]
pub struct WorkflowEngine {
    classifier: IntentClassifier,
    registry: WorkflowRegistry,
}

impl WorkflowEngine {
    /// Creates an engine from a classifier and a registry.
    #[must_use]
    pub const fn new(classifier: IntentClassifier, registry: WorkflowRegistry) -> Self {
        Self {
            classifier,
            registry,
        }
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    /// Classifies `input` against the conversation so far.
    ///
    /// An unusable classification falls back to [`Intent::DEFAULT`] from
    /// idle and to [`Intent::Unclear`] otherwise, so a classifier failure
    /// mid-workflow keeps the active workflow.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Cancelled`] when the turn is cancelled.
    pub async fn classify(
        &self,
        state: &AgentState,
        input: &str,
        guard: &CallGuard,
    ) -> Result<IntentClassification, CallError> {
        self.classifier
            .classify(state.history(), input, fallback_intent(state.mode()), guard)
            .await
    }

    /// Runs the workflow selected for the turn's intent in the current mode,
    /// then moves the state into that workflow's mode.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the selected workflow fails. The mode
    /// is left unchanged in that case.
    #[instrument(skip_all, fields(intent = %turn.intent, mode = %state.mode()))]
    pub async fn dispatch(
        &self,
        state: &mut AgentState,
        turn: &TurnContext<'_>,
    ) -> Result<Dispatch, WorkflowError> {
        let workflow = self.registry.select(turn.intent, state.mode());
        info!(workflow = %workflow.kind(), "dispatching turn");
        state.workflow_mut().set_current_intent(turn.intent);

        let output = workflow.execute(state, turn).await?;
        state.set_mode(workflow.mode());

        Ok(Dispatch {
            kind: workflow.kind(),
            mode: workflow.mode(),
            output,
        })
    }
}

const fn fallback_intent(mode: Mode) -> Intent {
    if matches!(mode, Mode::Idle) {
        Intent::DEFAULT
    } else {
        Intent::Unclear
    }
}
