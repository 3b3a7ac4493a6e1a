//! Provider ports for the external task, sprint and document stores.

mod document;
mod error;
mod sprint;
mod task;

pub use document::DocProvider;
pub use error::{WorkspaceProviderError, WorkspaceResult};
pub use sprint::SprintProvider;
pub use task::TaskProvider;

#[cfg(test)]
pub(crate) use task::MockTaskProvider;
