//! Sprint provider port.

use super::WorkspaceResult;
use crate::workspace::domain::{EntityId, NewSprint, Sprint, SprintPlan};
use async_trait::async_trait;

/// Sprint store contract consumed by the assistant tools.
#[async_trait]
pub trait SprintProvider: Send + Sync {
    /// Creates a sprint and returns the stored record.
    async fn create(&self, sprint: &NewSprint) -> WorkspaceResult<Sprint>;

    /// Lists all sprints.
    async fn list(&self) -> WorkspaceResult<Vec<Sprint>>;

    /// Finds a sprint by identifier.
    async fn get_by_id(&self, id: &EntityId) -> WorkspaceResult<Option<Sprint>>;

    /// Plans the given tasks into a sprint and returns the updated sprint.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceProviderError::NotFound`] when the sprint
    /// does not exist.
    async fn plan(&self, plan: &SprintPlan) -> WorkspaceResult<Sprint>;
}
