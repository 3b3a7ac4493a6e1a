//! Services that maintain the manifest across turns.

mod state;

pub use state::{InterviewProgress, ManifestStateManager};
