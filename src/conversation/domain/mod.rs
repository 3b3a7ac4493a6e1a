//! Conversation domain types.

mod artifact;
mod message;
mod mode;
mod state;

pub use artifact::{ActionKind, Artifact, ArtifactSet, SuggestedAction};
pub use message::{ChatMessage, ChatRole};
pub use mode::Mode;
pub use state::{AgentState, CreatedEntity, ExecutionId, PendingExecution, WorkflowState};
