//! Chat history entries.

use super::{Artifact, SuggestedAction};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person using the assistant.
    User,
    /// The assistant.
    Assistant,
}

/// One entry in the conversation history.
///
/// Messages are immutable once appended to the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    role: ChatRole,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    artifacts: Vec<Artifact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suggested_actions: Vec<SuggestedAction>,
}

impl ChatMessage {
    /// Creates a user message stamped with the clock's current time.
    #[must_use]
    pub fn user(content: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(ChatRole::User, content.into(), clock.utc())
    }

    /// Creates an assistant message stamped with the clock's current time.
    #[must_use]
    pub fn assistant(content: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(ChatRole::Assistant, content.into(), clock.utc())
    }

    const fn new(role: ChatRole, content: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            content,
            timestamp,
            artifacts: Vec::new(),
            suggested_actions: Vec::new(),
        }
    }

    /// Attaches the artifacts produced by the turn.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Attaches the suggested follow-up actions.
    #[must_use]
    pub fn with_suggested_actions(mut self, actions: Vec<SuggestedAction>) -> Self {
        self.suggested_actions = actions;
        self
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> ChatRole {
        self.role
    }

    /// Returns the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was created.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the attached artifacts.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Returns the attached suggested actions.
    #[must_use]
    pub fn suggested_actions(&self) -> &[SuggestedAction] {
        &self.suggested_actions
    }
}
