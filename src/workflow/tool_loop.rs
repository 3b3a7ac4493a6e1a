//! Bounded tool-calling workflows.
//!
//! Query, idea, documenting, compiling, planning, analyzing and execution
//! workflows share one loop and differ only in their [`WorkflowProfile`].

use super::{
    LoopTermination, TurnContext, Workflow, WorkflowError, WorkflowKind, WorkflowOutput, accepts,
};
use crate::context::ContextBuilder;
use crate::conversation::domain::{AgentState, ArtifactSet, Mode};
use crate::extraction::extract_suggestions;
use crate::intent::Intent;
use crate::model::domain::{ModelMessage, ModelRequest};
use crate::model::ports::ModelProvider;
use crate::tools::{ToolExecutor, ToolSet};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Reply returned when the step limit is reached without a final answer.
pub const STEP_LIMIT_MESSAGE: &str = "I reached the execution limit for this request before \
finishing. The changes listed so far have been applied; ask me to continue if more is needed.";

/// Limits applied to the loop and the state it records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopLimits {
    /// Model invocations allowed per turn.
    pub max_steps: usize,
    /// Created entities remembered in workflow state.
    pub created_entity_limit: usize,
    /// Scratchpad notes kept.
    pub scratchpad_limit: usize,
}

/// What distinguishes one tool-calling workflow from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowProfile {
    /// Workflow identity.
    pub kind: WorkflowKind,
    /// Mode entered after the workflow runs.
    pub mode: Mode,
    /// Intent the workflow accepts; `None` accepts everything.
    pub intent: Option<Intent>,
    /// Tools exposed to the model.
    pub tools: ToolSet,
    /// Workflow-specific prompt instructions.
    pub instructions: &'static str,
}

impl WorkflowProfile {
    /// Answers questions using read-only tools.
    #[must_use]
    pub fn query() -> Self {
        Self {
            kind: WorkflowKind::Query,
            mode: Mode::Query,
            intent: Some(Intent::Query),
            tools: ToolSet::read_only(),
            instructions: "Answer the user's question about the project. Look things up with \
                the listing and reading tools instead of guessing, and cite task and document \
                titles in your answer.",
        }
    }

    /// Captures ideas as tasks and notes.
    #[must_use]
    pub fn idea() -> Self {
        Self {
            kind: WorkflowKind::Idea,
            mode: Mode::Idea,
            intent: Some(Intent::Idea),
            tools: ToolSet::idea(),
            instructions: "Help the user explore the idea. Ask what problem it solves and for \
                whom. When an idea is concrete, capture it as a task or a short note document \
                and check existing tasks for overlap first.",
        }
    }

    /// Writes and revises documents.
    #[must_use]
    pub fn documenting() -> Self {
        Self {
            kind: WorkflowKind::Documenting,
            mode: Mode::Documenting,
            intent: Some(Intent::Document),
            tools: ToolSet::documenting(),
            instructions: "Write or revise the requested document in well-structured Markdown. \
                Read existing documents before changing them. Create tasks or sprints only when \
                the user asks for them.",
        }
    }

    /// Compiles documents into tasks.
    #[must_use]
    pub fn compiling() -> Self {
        Self {
            kind: WorkflowKind::Compiling,
            mode: Mode::Compiling,
            intent: Some(Intent::Compile),
            tools: ToolSet::compiling(),
            instructions: "Turn the document the user means into engineering tasks with the \
                compile_document tool. Find the document id with list_documents if needed, then \
                summarise the created tasks and any warnings.",
        }
    }

    /// Organises work into sprints.
    #[must_use]
    pub fn planning() -> Self {
        Self {
            kind: WorkflowKind::Planning,
            mode: Mode::Planning,
            intent: Some(Intent::Plan),
            tools: ToolSet::planning(),
            instructions: "Plan sprints with the user. List existing sprints and tasks first, \
                create a sprint when needed, then move the agreed tasks into it with plan_sprint.",
        }
    }

    /// Reviews progress and risks.
    #[must_use]
    pub fn analyzing() -> Self {
        Self {
            kind: WorkflowKind::Analyzing,
            mode: Mode::Analyzing,
            intent: Some(Intent::Analyze),
            tools: ToolSet::read_only(),
            instructions: "Review the state of the project. Look at tasks, sprints and documents, \
                then report progress, blockers and risks with concrete recommendations.",
        }
    }

    /// Handles anything no other workflow takes.
    #[must_use]
    pub fn execution() -> Self {
        Self {
            kind: WorkflowKind::Execution,
            mode: Mode::Executing,
            intent: None,
            tools: ToolSet::full(),
            instructions: "Carry out the user's request using the available tools. Work step by \
                step, check results before continuing, and summarise what changed.",
        }
    }
}

/// A workflow that loops model calls and tool rounds up to a step limit.
pub struct ToolLoopWorkflow {
    profile: WorkflowProfile,
    model: Arc<dyn ModelProvider>,
    executor: ToolExecutor,
    context: ContextBuilder,
    limits: LoopLimits,
}

impl ToolLoopWorkflow {
    /// Creates a workflow from its profile and collaborators.
    #[must_use]
    pub const fn new(
        profile: WorkflowProfile,
        model: Arc<dyn ModelProvider>,
        executor: ToolExecutor,
        context: ContextBuilder,
        limits: LoopLimits,
    ) -> Self {
        Self {
            profile,
            model,
            executor,
            context,
            limits,
        }
    }

    /// Returns the profile.
    #[must_use]
    pub const fn profile(&self) -> &WorkflowProfile {
        &self.profile
    }
}

#[async_trait]
impl Workflow for ToolLoopWorkflow {
    fn kind(&self) -> WorkflowKind {
        self.profile.kind
    }

    fn mode(&self) -> Mode {
        self.profile.mode
    }

    fn supports(&self, intent: Intent, mode: Mode) -> bool {
        self.profile
            .intent
            .is_none_or(|own| accepts(own, self.profile.mode, intent, mode))
    }

    #[instrument(skip_all, fields(workflow = %self.profile.kind))]
    async fn execute(
        &self,
        state: &mut AgentState,
        turn: &TurnContext<'_>,
    ) -> Result<WorkflowOutput, WorkflowError> {
        let system = self
            .context
            .system_prompt(state, self.profile.instructions, true)?;
        let mut transcript = self
            .context
            .build_messages(state.history(), Some(&system), turn.input);
        let specs = if self.model.capabilities().supports_tool_binding() {
            self.profile.tools.specs()
        } else {
            debug!("model cannot bind tools, running without them");
            Vec::new()
        };

        let mut artifacts = ArtifactSet::new();
        let mut observations = Vec::new();
        let mut invocations = 0_usize;

        for step in 1..=self.limits.max_steps {
            let request = ModelRequest::new(transcript.clone()).with_tools(specs.clone());
            let response = turn.guard.run(self.model.invoke(request)).await??;
            invocations = step;

            if !response.has_tool_calls() {
                let extraction = extract_suggestions(&response.content);
                info!(step, artifacts = artifacts.len(), "workflow completed");
                return Ok(WorkflowOutput {
                    content: extraction.content,
                    artifacts: artifacts.into_vec(),
                    suggested_actions: extraction.actions,
                    observations,
                    termination: LoopTermination::Completed,
                    model_invocations: invocations,
                });
            }

            let round = self
                .executor
                .execute(&response.tool_calls, &self.profile.tools, turn.guard, turn.now)
                .await?;
            let names: Vec<&str> = response
                .tool_calls
                .iter()
                .map(|call| call.name.as_str())
                .collect();
            debug!(step, tools = ?names, failures = round.failure_count(), "tool round finished");
            state.note(
                format!(
                    "{} step {step}: called {} ({} failed)",
                    self.profile.kind,
                    names.join(", "),
                    round.failure_count()
                ),
                self.limits.scratchpad_limit,
            );
            state
                .workflow_mut()
                .record_entities(round.created.iter().cloned(), self.limits.created_entity_limit);

            let assistant_turn = if response.content.trim().is_empty() {
                format!("Calling tools: {}", names.join(", "))
            } else {
                response.content.clone()
            };
            transcript.push(ModelMessage::assistant(assistant_turn));
            transcript.push(ModelMessage::user(round.observation_message()));
            artifacts.extend(round.artifacts.into_vec());
            observations.extend(round.observations);
        }

        warn!(
            max_steps = self.limits.max_steps,
            "step limit reached without a final reply"
        );
        Ok(WorkflowOutput {
            content: STEP_LIMIT_MESSAGE.to_owned(),
            artifacts: artifacts.into_vec(),
            suggested_actions: Vec::new(),
            observations,
            termination: LoopTermination::StepLimitReached,
            model_invocations: invocations,
        })
    }
}
