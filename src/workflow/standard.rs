//! The stock workflow roster.

use super::{
    InterviewWorkflow, LoopLimits, RegistryError, ToolLoopWorkflow, Workflow, WorkflowEngine,
    WorkflowProfile, WorkflowRegistry, WorkflowRegistryBuilder,
};
use crate::compiler::DocumentCompiler;
use crate::config::AgentConfig;
use crate::context::ContextBuilder;
use crate::intent::IntentClassifier;
use crate::model::ports::ModelProvider;
use crate::tools::{ToolExecutor, WorkspaceToolbox};
use std::sync::Arc;

/// Builds the standard registry: interview, query, idea, documenting,
/// compiling, planning and analyzing in that order, with execution as the
/// fallback.
///
/// The toolbox's document compiler is bound to `model`.
///
/// # Errors
///
/// Returns [`RegistryError::Config`] when `config` fails validation, or
/// [`RegistryError::DuplicateKind`] if the roster contains a duplicate kind.
pub fn standard_registry(
    model: &Arc<dyn ModelProvider>,
    toolbox: &WorkspaceToolbox,
    config: &AgentConfig,
) -> Result<WorkflowRegistry, RegistryError> {
    config.validate()?;
    let context = ContextBuilder::new(config.context_history_window);
    let limits = LoopLimits {
        max_steps: config.max_steps,
        created_entity_limit: config.created_entity_limit,
        scratchpad_limit: config.scratchpad_limit,
    };
    let executor = ToolExecutor::new(
        toolbox
            .clone()
            .with_compiler(DocumentCompiler::new(Arc::clone(model))),
    );
    let looped = |profile: WorkflowProfile| -> Arc<dyn Workflow> {
        Arc::new(ToolLoopWorkflow::new(
            profile,
            Arc::clone(model),
            executor.clone(),
            context,
            limits,
        ))
    };

    WorkflowRegistryBuilder::new()
        .route(Arc::new(InterviewWorkflow::new(Arc::clone(model), context)))
        .route(looped(WorkflowProfile::query()))
        .route(looped(WorkflowProfile::idea()))
        .route(looped(WorkflowProfile::documenting()))
        .route(looped(WorkflowProfile::compiling()))
        .route(looped(WorkflowProfile::planning()))
        .route(looped(WorkflowProfile::analyzing()))
        .build(looped(WorkflowProfile::execution()))
}

impl WorkflowEngine {
    /// Builds an engine with the standard registry and a classifier sharing
    /// `model`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when `config` is invalid or the roster
    /// contains a duplicate kind.
    pub fn standard(
        model: &Arc<dyn ModelProvider>,
        toolbox: &WorkspaceToolbox,
        config: &AgentConfig,
    ) -> Result<Self, RegistryError> {
        let registry = standard_registry(model, toolbox, config)?;
        let classifier = IntentClassifier::new(Arc::clone(model), config.classifier_history_window);
        Ok(Self::new(classifier, registry))
    }
}
