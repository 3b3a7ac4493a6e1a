//! In-memory sprint provider.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::{allocate_id, lock_error};
use crate::workspace::{
    domain::{EntityId, EntityKind, NewSprint, Sprint, SprintPlan},
    ports::{SprintProvider, WorkspaceProviderError, WorkspaceResult},
};

/// Thread-safe in-memory sprint store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySprintProvider {
    state: Arc<RwLock<InMemorySprintState>>,
}

#[derive(Debug, Default)]
struct InMemorySprintState {
    next_id: u64,
    sprints: Vec<Sprint>,
}

impl InMemorySprintProvider {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SprintProvider for InMemorySprintProvider {
    async fn create(&self, sprint: &NewSprint) -> WorkspaceResult<Sprint> {
        sprint.validate()?;
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let id = allocate_id("sprint", &mut state.next_id)?;
        let stored = Sprint {
            id,
            name: sprint.name.trim().to_owned(),
            goal: sprint.goal.clone(),
            start_date: sprint.start_date,
            end_date: sprint.end_date,
            task_ids: Vec::new(),
        };
        state.sprints.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> WorkspaceResult<Vec<Sprint>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.sprints.clone())
    }

    async fn get_by_id(&self, id: &EntityId) -> WorkspaceResult<Option<Sprint>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.sprints.iter().find(|sprint| &sprint.id == id).cloned())
    }

    async fn plan(&self, plan: &SprintPlan) -> WorkspaceResult<Sprint> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let sprint = state
            .sprints
            .iter_mut()
            .find(|sprint| sprint.id == plan.sprint_id)
            .ok_or_else(|| {
                WorkspaceProviderError::not_found(EntityKind::Sprint, plan.sprint_id.clone())
            })?;
        for task_id in &plan.task_ids {
            if !sprint.task_ids.contains(task_id) {
                sprint.task_ids.push(task_id.clone());
            }
        }
        Ok(sprint.clone())
    }
}
