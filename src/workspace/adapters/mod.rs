//! Adapter implementations for the workspace provider ports.

pub mod memory;

pub use memory::{InMemoryDocProvider, InMemorySprintProvider, InMemoryTaskProvider};
