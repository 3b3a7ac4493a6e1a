//! In-memory task provider.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::{allocate_id, lock_error};
use crate::workspace::{
    domain::{EntityId, EntityKind, NewTask, Task, TaskFilter, TaskPatch, TaskUpdate},
    ports::{TaskProvider, WorkspaceProviderError, WorkspaceResult},
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskProvider {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    next_id: u64,
    tasks: Vec<Task>,
}

impl InMemoryTaskProvider {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every stored task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceProviderError::Unavailable`] when the lock is
    /// poisoned.
    pub fn snapshot(&self) -> WorkspaceResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.tasks.clone())
    }
}

fn update_in_place(
    state: &mut InMemoryTaskState,
    id: &EntityId,
    patch: &TaskPatch,
) -> WorkspaceResult<Task> {
    let task = state
        .tasks
        .iter_mut()
        .find(|task| &task.id == id)
        .ok_or_else(|| WorkspaceProviderError::not_found(EntityKind::Task, id.clone()))?;
    patch.apply_to(task);
    Ok(task.clone())
}

#[async_trait]
impl TaskProvider for InMemoryTaskProvider {
    async fn create(&self, task: &NewTask) -> WorkspaceResult<Task> {
        task.validate()?;
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let id = allocate_id("task", &mut state.next_id)?;
        let stored = Task {
            id,
            title: task.title.trim().to_owned(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            sprint_id: task.sprint_id.clone(),
        };
        state.tasks.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &EntityId, patch: &TaskPatch) -> WorkspaceResult<Task> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        update_in_place(&mut state, id, patch)
    }

    async fn batch_update(&self, updates: &[TaskUpdate]) -> WorkspaceResult<Vec<Task>> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        // Validate every target first so a bad id leaves the store untouched.
        if let Some(missing) = updates
            .iter()
            .find(|update| !state.tasks.iter().any(|task| task.id == update.id))
        {
            return Err(WorkspaceProviderError::not_found(
                EntityKind::Task,
                missing.id.clone(),
            ));
        }
        updates
            .iter()
            .map(|update| update_in_place(&mut state, &update.id, &update.patch))
            .collect()
    }

    async fn list(&self, filter: &TaskFilter) -> WorkspaceResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state
            .tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &EntityId) -> WorkspaceResult<Option<Task>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.tasks.iter().find(|task| &task.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::domain::TaskStatus;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> InMemoryTaskProvider {
        InMemoryTaskProvider::new()
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn create_allocates_sequential_ids(provider: InMemoryTaskProvider) {
        let first = provider
            .create(&NewTask::new("One").expect("valid task"))
            .await
            .expect("create should succeed");
        let second = provider
            .create(&NewTask::new("Two").expect("valid task"))
            .await
            .expect("create should succeed");

        assert_eq!(first.id.as_str(), "task-1");
        assert_eq!(second.id.as_str(), "task-2");
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn batch_update_is_all_or_nothing(provider: InMemoryTaskProvider) {
        let created = provider
            .create(&NewTask::new("One").expect("valid task"))
            .await
            .expect("create should succeed");
        let updates = vec![
            TaskUpdate {
                id: created.id.clone(),
                patch: TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..TaskPatch::default()
                },
            },
            TaskUpdate {
                id: EntityId::new("task-99").expect("valid id"),
                patch: TaskPatch::default(),
            },
        ];

        let result = provider.batch_update(&updates).await;

        assert!(matches!(
            result,
            Err(WorkspaceProviderError::NotFound { kind: EntityKind::Task, .. })
        ));
        let stored = provider
            .get_by_id(&created.id)
            .await
            .expect("lookup should succeed")
            .expect("task should exist");
        assert_eq!(stored.status, TaskStatus::Todo);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn list_applies_status_filter(provider: InMemoryTaskProvider) {
        let created = provider
            .create(&NewTask::new("One").expect("valid task"))
            .await
            .expect("create should succeed");
        provider
            .create(&NewTask::new("Two").expect("valid task"))
            .await
            .expect("create should succeed");
        provider
            .update(
                &created.id,
                &TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..TaskPatch::default()
                },
            )
            .await
            .expect("update should succeed");

        let done = provider
            .list(&TaskFilter {
                status: Some(TaskStatus::Done),
                sprint_id: None,
            })
            .await
            .expect("list should succeed");

        assert_eq!(done.len(), 1);
        assert_eq!(done.first().map(|task| task.title.as_str()), Some("One"));
    }
}
