//! Task records exchanged with the task provider.

use super::{EntityId, WorkspaceDomainError};
use serde::{Deserialize, Serialize};

/// Board priority of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait.
    #[serde(alias = "LOW")]
    Low,
    /// Normal priority.
    #[default]
    #[serde(alias = "MEDIUM")]
    Medium,
    /// Should be picked up first.
    #[serde(alias = "HIGH")]
    High,
}

impl TaskPriority {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Board column of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    #[serde(alias = "TODO")]
    Todo,
    /// Being worked on.
    #[serde(alias = "IN_PROGRESS")]
    InProgress,
    /// Awaiting review.
    #[serde(alias = "REVIEW")]
    Review,
    /// Finished.
    #[serde(alias = "DONE")]
    Done,
}

impl TaskStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }
}

/// A task as stored by the task provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Provider-assigned identifier.
    pub id: EntityId,
    /// Short title shown on the board.
    pub title: String,
    /// Detailed description, usually Markdown.
    #[serde(default)]
    pub description: String,
    /// Board column.
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Sprint the task is planned into, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<EntityId>,
}

/// Creation payload for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Task description.
    #[serde(default)]
    pub description: String,
    /// Initial board column.
    #[serde(default)]
    pub status: TaskStatus,
    /// Initial priority.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Sprint to plan the task into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<EntityId>,
}

impl NewTask {
    /// Creates a payload with a validated title and default fields.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let owned = title.into();
        if owned.trim().is_empty() {
            return Err(WorkspaceDomainError::EmptyTitle("task"));
        }
        Ok(Self {
            title: owned,
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            sprint_id: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Validates a payload that arrived through deserialisation.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyTitle`] when the title is blank.
    pub fn validate(&self) -> Result<(), WorkspaceDomainError> {
        if self.title.trim().is_empty() {
            return Err(WorkspaceDomainError::EmptyTitle("task"));
        }
        Ok(())
    }
}

/// Partial update for a task. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New board column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New sprint assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<EntityId>,
}

impl TaskPatch {
    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.sprint_id.is_none()
    }

    /// Applies the patch to a task in place.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(sprint_id) = &self.sprint_id {
            task.sprint_id = Some(sprint_id.clone());
        }
    }
}

/// One entry of a batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// Task to update.
    #[serde(alias = "taskId")]
    pub id: EntityId,
    /// Changes to apply.
    #[serde(flatten)]
    pub patch: TaskPatch,
}

/// Filter for listing tasks. Empty filters match every task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Only tasks in this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Only tasks planned into this sprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<EntityId>,
}

impl TaskFilter {
    /// Returns `true` when the task satisfies the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_matches = self.status.is_none_or(|status| status == task.status);
        let sprint_matches = self
            .sprint_id
            .as_ref()
            .is_none_or(|sprint_id| task.sprint_id.as_ref() == Some(sprint_id));
        status_matches && sprint_matches
    }
}
