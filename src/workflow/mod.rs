//! The workflow engine and its workflows.
//!
//! Each turn is classified, dispatched to the first registered workflow that
//! accepts the intent in the current mode, and the engine then moves into
//! that workflow's mode. The registry always ends in a fallback workflow, so
//! dispatch cannot fail to find a handler.

mod engine;
mod interview;
mod registry;
mod standard;
mod tool_loop;
mod turn;

pub use engine::{Dispatch, WorkflowEngine};
pub use interview::InterviewWorkflow;
pub use registry::{
    RegistryError, Workflow, WorkflowKind, WorkflowRegistry, WorkflowRegistryBuilder, accepts,
};
pub use standard::standard_registry;
pub use tool_loop::{LoopLimits, STEP_LIMIT_MESSAGE, ToolLoopWorkflow, WorkflowProfile};
pub use turn::{LoopTermination, TurnContext, WorkflowError, WorkflowOutput};
