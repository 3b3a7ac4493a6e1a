//! The conversation aggregate and its workflow bookkeeping.

use super::{ChatMessage, Mode};
use crate::intent::Intent;
use crate::manifest::domain::{ManifestField, ManifestUpdate, ProjectManifest};
use crate::manifest::services::{InterviewProgress, ManifestStateManager};
use crate::workspace::domain::{EntityId, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier handed out by the two-phase detect/execute flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    /// Creates a new random execution identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an execution identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An intent detected but not yet executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingExecution {
    /// Intent detected for the input.
    pub intent: Intent,
    /// The user input awaiting confirmation.
    pub original_input: String,
    /// Identifier the caller must present to execute.
    pub execution_id: ExecutionId,
}

/// An entity created earlier in the session.
///
/// Fed back into prompts so the model refers to real identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEntity {
    /// Provider identifier.
    pub id: EntityId,
    /// Entity kind.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Title at creation time.
    pub title: String,
    /// When the entity was created.
    pub created_at: DateTime<Utc>,
}

/// Per-session workflow bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    current_intent: Option<Intent>,
    created_entities: Vec<CreatedEntity>,
    pending_actions: Vec<String>,
    manifest_summary: String,
}

impl WorkflowState {
    /// Returns the intent of the latest turn.
    #[must_use]
    pub const fn current_intent(&self) -> Option<Intent> {
        self.current_intent
    }

    /// Records the intent of the current turn.
    pub const fn set_current_intent(&mut self, intent: Intent) {
        self.current_intent = Some(intent);
    }

    /// Returns the entities created this session, oldest first.
    #[must_use]
    pub fn created_entities(&self) -> &[CreatedEntity] {
        &self.created_entities
    }

    /// Records created entities, keeping at most `limit` of the most recent.
    ///
    /// An entity whose id is already recorded replaces the earlier entry.
    pub fn record_entities(&mut self, entities: impl IntoIterator<Item = CreatedEntity>, limit: usize) {
        for entity in entities {
            self.created_entities.retain(|existing| existing.id != entity.id);
            self.created_entities.push(entity);
        }
        let excess = self.created_entities.len().saturating_sub(limit);
        if excess > 0 {
            self.created_entities.drain(..excess);
        }
    }

    /// Returns follow-ups the assistant has promised but not performed.
    #[must_use]
    pub fn pending_actions(&self) -> &[String] {
        &self.pending_actions
    }

    /// Replaces the outstanding follow-ups.
    pub fn set_pending_actions(&mut self, actions: Vec<String>) {
        self.pending_actions = actions;
    }

    /// Returns the condensed manifest summary.
    #[must_use]
    pub fn manifest_summary(&self) -> &str {
        &self.manifest_summary
    }

    /// Replaces the condensed manifest summary.
    pub fn set_manifest_summary(&mut self, summary: String) {
        self.manifest_summary = summary;
    }
}

/// All state for one conversation.
///
/// Exactly one turn may mutate a given state at a time; the
/// [`Agent`](crate::agent::Agent) enforces this by taking `&mut self` and
/// committing a turn's changes only once the turn succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentState {
    mode: Mode,
    scratchpad: Vec<String>,
    missing_info: Vec<ManifestField>,
    history: Vec<ChatMessage>,
    manifest: ProjectManifest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workflow: Option<WorkflowState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending: Option<PendingExecution>,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentState {
    /// Creates the state for a fresh conversation with an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::with_manifest(ProjectManifest::new())
    }

    /// Creates the state for a conversation about an existing manifest.
    #[must_use]
    pub fn with_manifest(mut manifest: ProjectManifest) -> Self {
        let missing_info = ManifestStateManager::new().assess(&mut manifest);
        Self {
            mode: Mode::Idle,
            scratchpad: Vec::new(),
            missing_info,
            history: Vec::new(),
            manifest,
            workflow: None,
            pending: None,
        }
    }

    /// Returns the current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Sets the mode.
    pub const fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Returns the working notes kept between turns.
    #[must_use]
    pub fn scratchpad(&self) -> &[String] {
        &self.scratchpad
    }

    /// Appends a working note, keeping at most `limit` notes.
    pub fn note(&mut self, note: impl Into<String>, limit: usize) {
        self.scratchpad.push(note.into());
        let excess = self.scratchpad.len().saturating_sub(limit);
        if excess > 0 {
            self.scratchpad.drain(..excess);
        }
    }

    /// Returns the required manifest fields not yet judged complete.
    #[must_use]
    pub fn missing_info(&self) -> &[ManifestField] {
        &self.missing_info
    }

    /// Returns the project manifest.
    #[must_use]
    pub const fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    /// Merges an interview turn into the manifest.
    pub fn apply_interview(
        &mut self,
        update: &ManifestUpdate,
        judged_complete: &[ManifestField],
    ) -> InterviewProgress {
        let manager = ManifestStateManager::new();
        let progress = manager.apply_interview(
            &mut self.manifest,
            &mut self.missing_info,
            update,
            judged_complete,
        );
        let summary = manager.summary(&self.manifest, &self.missing_info);
        self.workflow_mut().set_manifest_summary(summary);
        progress
    }

    /// Returns the manifest summary, computing it when no workflow state
    /// exists yet.
    #[must_use]
    pub fn manifest_summary(&self) -> String {
        self.workflow.as_ref().map_or_else(
            || ManifestStateManager::new().summary(&self.manifest, &self.missing_info),
            |workflow| workflow.manifest_summary().to_owned(),
        )
    }

    /// Returns the conversation history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Appends a message to the history.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.history.push(message);
    }

    /// Returns the workflow bookkeeping, if any workflow has run.
    #[must_use]
    pub const fn workflow(&self) -> Option<&WorkflowState> {
        self.workflow.as_ref()
    }

    /// Returns the workflow bookkeeping, creating it on first use.
    pub fn workflow_mut(&mut self) -> &mut WorkflowState {
        let manifest = &self.manifest;
        let missing = &self.missing_info;
        self.workflow.get_or_insert_with(|| {
            let mut fresh = WorkflowState::default();
            fresh.set_manifest_summary(ManifestStateManager::new().summary(manifest, missing));
            fresh
        })
    }

    /// Returns the execution awaiting confirmation.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingExecution> {
        self.pending.as_ref()
    }

    /// Stores an execution awaiting confirmation, replacing any earlier one.
    pub fn set_pending(&mut self, pending: PendingExecution) {
        self.pending = Some(pending);
    }

    /// Removes and returns the pending execution.
    pub const fn take_pending(&mut self) -> Option<PendingExecution> {
        self.pending.take()
    }
}
