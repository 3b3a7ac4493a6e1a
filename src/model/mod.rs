//! Language model access.
//!
//! The [`ports::ModelProvider`] port is the only way the assistant talks to a
//! model. Adapters resolve what the backing model supports once, at
//! construction, and expose it through [`domain::ModelCapabilities`].

pub mod adapters;
pub mod domain;
pub mod ports;
