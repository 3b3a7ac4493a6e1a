//! Workspace collaborators: tasks, sprints and documents.
//!
//! The board, the document tree and sprint storage live outside this crate.
//! The assistant reaches them only through three narrow provider ports:
//!
//! - Domain records in [`domain`]
//! - Provider contracts in [`ports`]
//! - In-memory adapters in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
