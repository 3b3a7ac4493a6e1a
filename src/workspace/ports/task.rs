//! Task provider port.

use super::WorkspaceResult;
use crate::workspace::domain::{EntityId, NewTask, Task, TaskFilter, TaskPatch, TaskUpdate};
use async_trait::async_trait;

/// Task store contract consumed by the assistant tools.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// Creates a task and returns the stored record.
    async fn create(&self, task: &NewTask) -> WorkspaceResult<Task>;

    /// Applies a partial update to one task.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceProviderError::NotFound`] when the task does
    /// not exist.
    async fn update(&self, id: &EntityId, patch: &TaskPatch) -> WorkspaceResult<Task>;

    /// Applies several updates in order and returns the updated records.
    async fn batch_update(&self, updates: &[TaskUpdate]) -> WorkspaceResult<Vec<Task>>;

    /// Lists tasks matching the filter.
    async fn list(&self, filter: &TaskFilter) -> WorkspaceResult<Vec<Task>>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn get_by_id(&self, id: &EntityId) -> WorkspaceResult<Option<Task>>;
}
