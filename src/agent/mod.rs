//! The conversational agent: the public entry point for turns.
//!
//! [`Agent`] owns one conversation's [`AgentState`](crate::conversation::domain::AgentState)
//! and runs each turn against a draft copy, committing it only when the turn
//! succeeds. [`AgentSession`] wraps an agent in a task so several callers can
//! share one conversation without racing on its state.

mod error;
mod response;
mod service;
mod session;

pub use error::{AgentError, AgentResult};
pub use response::{PendingIntent, TurnResponse};
pub use service::Agent;
pub use session::AgentSession;
