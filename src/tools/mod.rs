//! Tools the model can call, and their execution.
//!
//! [`ToolName`] is the catalogue, [`ToolSet`] scopes it per workflow,
//! [`WorkspaceToolbox`] implements each tool against the workspace providers
//! and [`ToolExecutor`] runs a round of calls and gathers observations and
//! artifacts.

mod artifacts;
mod catalog;
mod executor;
mod toolbox;

pub use artifacts::{ParsedResult, parse_result};
pub use catalog::{ToolName, ToolSet, UnknownToolError};
pub use executor::{ToolExecutor, ToolObservation, ToolOutcome, ToolRound};
pub use toolbox::{ToolError, WorkspaceToolbox};

#[cfg(test)]
mod tests;
