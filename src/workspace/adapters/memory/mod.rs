//! In-memory workspace providers for tests and local sessions.
//!
//! Identifiers are allocated sequentially per kind (`task-1`, `doc-1`,
//! `sprint-1`) so transcripts stay readable.

mod document;
mod sprint;
mod task;

pub use document::InMemoryDocProvider;
pub use sprint::InMemorySprintProvider;
pub use task::InMemoryTaskProvider;

use crate::workspace::{domain::EntityId, ports::WorkspaceProviderError};

fn lock_error(err: &impl std::fmt::Display) -> WorkspaceProviderError {
    WorkspaceProviderError::unavailable(std::io::Error::other(format!("lock poisoned: {err}")))
}

fn allocate_id(prefix: &str, counter: &mut u64) -> Result<EntityId, WorkspaceProviderError> {
    *counter = counter.saturating_add(1);
    Ok(EntityId::new(format!("{prefix}-{counter}"))?)
}
