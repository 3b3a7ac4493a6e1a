//! Records exchanged with the workspace providers.
//!
//! These are plain data carriers owned by the external providers; the
//! assistant never enforces board rules on them.

mod document;
mod error;
mod ids;
mod sprint;
mod task;

pub use document::{Document, DocumentPatch, NewDocument};
pub use error::{ParseEntityKindError, WorkspaceDomainError};
pub use ids::{EntityId, EntityKind};
pub use sprint::{NewSprint, Sprint, SprintPlan};
pub use task::{NewTask, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus, TaskUpdate};
