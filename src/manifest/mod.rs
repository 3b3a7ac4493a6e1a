//! Structured project profile tracked by the assistant.
//!
//! The manifest records what the assistant knows about the project being
//! built (mission, users, stack, features) together with a derived
//! completeness score. The interview workflow fills it in over several turns.
//!
//! - Domain types in [`domain`]
//! - State management in [`services`]

pub mod domain;
pub mod services;
