//! Conversation state owned by one assistant session.
//!
//! The [`domain::AgentState`] aggregate carries the manifest, history and
//! workflow bookkeeping for a single conversation. It is serialisable so the
//! caller can persist and rehydrate sessions.

pub mod domain;
