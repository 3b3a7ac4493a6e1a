//! Atelier: workflow orchestration for a project-management assistant.
//!
//! Each user turn is classified into an intent, dispatched to a workflow
//! chosen by intent and the current conversational mode, and handled either
//! by a structured interview call or by a bounded tool-calling loop against
//! task, sprint and document providers.
//!
//! # Architecture
//!
//! Atelier follows hexagonal architecture principles:
//!
//! - **Domain**: conversation state, the project manifest and workspace records
//! - **Ports**: traits for the language model and the workspace providers
//! - **Adapters**: an OpenAI-compatible HTTP model client, a scripted model
//!   and in-memory workspace providers
//!
//! # Modules
//!
//! - [`agent`]: the turn entry point and the per-conversation session task
//! - [`workflow`]: the engine, its registry and the workflows
//! - [`intent`]: intent classification
//! - [`tools`]: the tool catalogue and the tool executor
//! - [`compiler`]: document-to-task compilation
//! - [`context`]: prompt and transcript assembly
//! - [`manifest`]: the project manifest and its completeness tracking
//! - [`conversation`]: agent state, messages and artifacts
//! - [`model`]: the model provider port and its adapters
//! - [`workspace`]: task, sprint and document providers
//! - [`extraction`]: tolerant parsing of structured model output
//! - [`external`]: timeouts and cancellation for external calls
//! - [`config`]: configuration

pub mod agent;
pub mod compiler;
pub mod config;
pub mod context;
pub mod conversation;
pub mod external;
pub mod extraction;
pub mod intent;
pub mod manifest;
pub mod model;
pub mod tools;
pub mod workflow;
pub mod workspace;
