//! Turn orchestration over a single conversation.

use super::{AgentError, AgentResult, PendingIntent, TurnResponse};
use crate::config::AgentConfig;
use crate::conversation::domain::{
    AgentState, ChatMessage, ExecutionId, PendingExecution, SuggestedAction,
};
use crate::external::CallGuard;
use crate::intent::Intent;
use crate::workflow::{TurnContext, WorkflowEngine};
use mockable::Clock;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

const CONFIRM_LABEL: &str = "Go ahead";

/// Runs turns for one conversation.
///
/// Methods take `&mut self`, so a single agent never has two turns in
/// flight. Each turn works on a copy of the state and replaces the committed
/// state only when it succeeds.
pub struct Agent<C>
where
    C: Clock + Send + Sync,
{
    state: AgentState,
    engine: WorkflowEngine,
    config: AgentConfig,
    clock: Arc<C>,
}

impl<C> Agent<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an agent for a fresh conversation.
    #[must_use]
    pub fn new(engine: WorkflowEngine, config: AgentConfig, clock: Arc<C>) -> Self {
        Self::from_state(AgentState::new(), engine, config, clock)
    }

    /// Resumes a conversation from a stored snapshot.
    #[must_use]
    pub const fn from_state(
        state: AgentState,
        engine: WorkflowEngine,
        config: AgentConfig,
        clock: Arc<C>,
    ) -> Self {
        Self {
            state,
            engine,
            config,
            clock,
        }
    }

    /// Returns the committed state.
    #[must_use]
    pub const fn state(&self) -> &AgentState {
        &self.state
    }

    /// Returns a copy of the committed state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> AgentState {
        self.state.clone()
    }

    /// Returns the workflow engine.
    #[must_use]
    pub const fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Handles a user message.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] when a call times out or the workflow fails.
    pub async fn handle_message(&mut self, input: &str) -> AgentResult<TurnResponse> {
        self.handle_message_with(input, CancellationToken::new())
            .await
    }

    /// Handles a user message, aborting when `cancel` fires.
    ///
    /// Any pending execution is discarded once the turn commits.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] when the turn is cancelled, a call times out or
    /// the workflow fails. The committed state is unchanged in every error
    /// case.
    #[instrument(skip_all, fields(input_len = input.len()))]
    pub async fn handle_message_with(
        &mut self,
        input: &str,
        cancel: CancellationToken,
    ) -> AgentResult<TurnResponse> {
        let guard = self.guard(cancel);
        let mut draft = self.state.clone();
        draft.take_pending();

        let classification = self.engine.classify(&draft, input, &guard).await?;
        info!(
            intent = %classification.intent,
            confidence = classification.confidence,
            "turn classified"
        );
        self.run_turn(draft, input, classification.intent, &guard)
            .await
    }

    /// Classifies `input` and stores it as a pending execution without
    /// running it.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Call`] when classification is cancelled.
    pub async fn detect_intent(&mut self, input: &str) -> AgentResult<PendingIntent> {
        self.detect_intent_with(input, CancellationToken::new())
            .await
    }

    /// Like [`Agent::detect_intent`], aborting when `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Call`] when classification is cancelled.
    #[instrument(skip_all)]
    pub async fn detect_intent_with(
        &mut self,
        input: &str,
        cancel: CancellationToken,
    ) -> AgentResult<PendingIntent> {
        let guard = self.guard(cancel);
        let classification = self.engine.classify(&self.state, input, &guard).await?;
        let execution_id = ExecutionId::new();
        self.state.set_pending(PendingExecution {
            intent: classification.intent,
            original_input: input.to_owned(),
            execution_id,
        });
        info!(%execution_id, intent = %classification.intent, "execution pending");

        Ok(PendingIntent {
            action: SuggestedAction::execute_pending(CONFIRM_LABEL, execution_id.to_string()),
            classification,
            execution_id,
        })
    }

    /// Runs the pending execution with the intent it was classified with.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownExecution`] when `execution_id` is not the
    /// pending execution, and the errors of [`Agent::handle_message_with`]
    /// otherwise. A failed run keeps the execution pending.
    pub async fn execute_pending(&mut self, execution_id: ExecutionId) -> AgentResult<TurnResponse> {
        self.execute_pending_with(execution_id, CancellationToken::new())
            .await
    }

    /// Like [`Agent::execute_pending`], aborting when `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`Agent::execute_pending`].
    #[instrument(skip_all, fields(%execution_id))]
    pub async fn execute_pending_with(
        &mut self,
        execution_id: ExecutionId,
        cancel: CancellationToken,
    ) -> AgentResult<TurnResponse> {
        let mut draft = self.state.clone();
        let pending = match draft.take_pending() {
            Some(found) if found.execution_id == execution_id => found,
            _ => return Err(AgentError::UnknownExecution(execution_id)),
        };
        let guard = self.guard(cancel);
        self.run_turn(draft, &pending.original_input, pending.intent, &guard)
            .await
    }

    async fn run_turn(
        &mut self,
        mut draft: AgentState,
        input: &str,
        intent: Intent,
        guard: &CallGuard,
    ) -> AgentResult<TurnResponse> {
        let turn = TurnContext {
            input,
            intent,
            guard,
            now: self.clock.utc(),
        };
        let dispatch = self.engine.dispatch(&mut draft, &turn).await?;
        let output = dispatch.output;

        draft.push_message(ChatMessage::user(input, self.clock.as_ref()));
        draft.push_message(
            ChatMessage::assistant(output.content.clone(), self.clock.as_ref())
                .with_artifacts(output.artifacts.clone())
                .with_suggested_actions(output.suggested_actions.clone()),
        );
        self.state = draft;
        info!(
            workflow = %dispatch.kind,
            mode = %dispatch.mode,
            artifacts = output.artifacts.len(),
            "turn committed"
        );

        Ok(TurnResponse {
            content: output.content,
            artifacts: output.artifacts,
            suggested_actions: output.suggested_actions,
            intent,
            workflow: dispatch.kind,
            mode: dispatch.mode,
            observations: output.observations,
            termination: output.termination,
        })
    }

    fn guard(&self, cancel: CancellationToken) -> CallGuard {
        CallGuard::new(cancel, self.config.call_timeout())
    }
}
