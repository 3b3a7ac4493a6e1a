//! Artifacts and suggested actions surfaced to the caller alongside a reply.

use crate::workspace::domain::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A typed record of a task, document or sprint touched during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Provider identifier of the entity.
    pub id: EntityId,
    /// Entity kind.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Display title.
    pub title: String,
    /// Body text shown to the user.
    pub content: String,
    /// Provider-specific extras such as status or priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Artifacts collected over a turn, unique by id.
///
/// Inserting an id that is already present replaces the earlier value but
/// keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactSet {
    items: Vec<Artifact>,
}

impl ArtifactSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Inserts or replaces an artifact.
    pub fn insert(&mut self, artifact: Artifact) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == artifact.id) {
            *existing = artifact;
            return;
        }
        self.items.push(artifact);
    }

    /// Returns the number of distinct artifacts.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when no artifacts were collected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the artifacts in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.items.iter()
    }

    /// Consumes the set, returning the artifacts in first-seen order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Artifact> {
        self.items
    }
}

impl Extend<Artifact> for ArtifactSet {
    fn extend<T: IntoIterator<Item = Artifact>>(&mut self, iter: T) {
        for artifact in iter {
            self.insert(artifact);
        }
    }
}

impl FromIterator<Artifact> for ArtifactSet {
    fn from_iter<T: IntoIterator<Item = Artifact>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// The kind of follow-up a suggested action triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Send the payload text as the next chat message.
    ChatSuggestion,
    /// Confirm a pending execution by id.
    ExecutePending,
}

/// A quick reply offered next to the assistant's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
    /// Button label.
    pub label: String,
    /// Action kind.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Kind-specific payload.
    pub payload: Value,
}

impl SuggestedAction {
    /// Creates a chat suggestion whose payload is `{"text": ...}`.
    #[must_use]
    pub fn chat(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ActionKind::ChatSuggestion,
            payload: json!({ "text": text.into() }),
        }
    }

    /// Creates an action that confirms a pending execution.
    #[must_use]
    pub fn execute_pending(label: impl Into<String>, execution_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ActionKind::ExecutePending,
            payload: json!({ "executionId": execution_id.into() }),
        }
    }

    /// Returns the text a chat suggestion would send, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.payload.get("text").and_then(Value::as_str)
    }
}
