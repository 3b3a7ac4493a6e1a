//! Prompt and transcript assembly.
//!
//! Everything here is a pure function of the conversation state, so prompts
//! can be asserted on directly in tests.

mod builder;

pub use builder::{ContextBuilder, ContextError, STANDARDS_OF_WORK};
