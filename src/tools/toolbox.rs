//! Tool implementations over the workspace providers.
//!
//! Every tool answers with a JSON string. Argument problems produce
//! `{"success": false, "error": ...}`; provider and compiler failures are
//! raised so the executor can report them as failed calls.

use super::ToolName;
use crate::compiler::{CompileError, DocumentCompiler};
use crate::external::{CallError, CallGuard};
use crate::workspace::domain::{
    DocumentPatch, EntityId, EntityKind, NewDocument, NewSprint, NewTask, SprintPlan, TaskFilter,
    TaskPatch, TaskUpdate,
};
use crate::workspace::ports::{DocProvider, SprintProvider, TaskProvider, WorkspaceProviderError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a tool call.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// The model sent arguments the tool cannot use.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool needs a capability that was not configured.
    #[error("{0} is not configured")]
    Unsupported(ToolName),

    /// A workspace provider failed.
    #[error(transparent)]
    Provider(#[from] WorkspaceProviderError),

    /// Document compilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The call was cancelled or timed out.
    #[error(transparent)]
    Call(#[from] CallError),
}

impl ToolError {
    /// Returns `true` when the error represents cancellation of the turn.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        match self {
            Self::Call(err) => err.is_cancelled(),
            Self::Compile(err) => err.is_cancelled(),
            _ => false,
        }
    }

    /// Returns the model reply attached to a compiler parse failure.
    #[must_use]
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Compile(err) => err.raw_output(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskArgs {
    #[serde(alias = "id", alias = "task_id")]
    task_id: EntityId,
    #[serde(flatten)]
    patch: TaskPatch,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateArgs {
    updates: Vec<TaskUpdate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRef {
    #[serde(alias = "id", alias = "doc_id")]
    doc_id: EntityId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDocumentArgs {
    #[serde(alias = "id", alias = "doc_id")]
    doc_id: EntityId,
    #[serde(flatten)]
    patch: DocumentPatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompileDocumentArgs {
    #[serde(alias = "id", alias = "doc_id")]
    doc_id: EntityId,
    #[serde(default, alias = "doc_type")]
    doc_type: Option<String>,
}

/// The workspace capabilities tools are executed against.
#[derive(Clone)]
pub struct WorkspaceToolbox {
    tasks: Arc<dyn TaskProvider>,
    sprints: Arc<dyn SprintProvider>,
    docs: Arc<dyn DocProvider>,
    compiler: Option<DocumentCompiler>,
}

impl WorkspaceToolbox {
    /// Creates a toolbox without a document compiler.
    #[must_use]
    pub const fn new(
        tasks: Arc<dyn TaskProvider>,
        sprints: Arc<dyn SprintProvider>,
        docs: Arc<dyn DocProvider>,
    ) -> Self {
        Self {
            tasks,
            sprints,
            docs,
            compiler: None,
        }
    }

    /// Enables `compile_document`.
    #[must_use]
    pub fn with_compiler(mut self, compiler: DocumentCompiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Runs one tool and returns its JSON result.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when a provider, the compiler or the call guard
    /// fails. Argument errors are reported in the returned JSON instead.
    pub async fn call(
        &self,
        tool: ToolName,
        arguments: &Value,
        guard: &CallGuard,
    ) -> Result<String, ToolError> {
        match self.dispatch(tool, arguments, guard).await {
            Ok(value) => Ok(value.to_string()),
            Err(ToolError::InvalidArguments(reason)) => {
                Ok(json!({ "success": false, "error": reason }).to_string())
            }
            Err(err) => Err(err),
        }
    }

    async fn dispatch(
        &self,
        tool: ToolName,
        arguments: &Value,
        guard: &CallGuard,
    ) -> Result<Value, ToolError> {
        match tool {
            ToolName::CreateTask => {
                let payload: NewTask = parse_args(arguments)?;
                payload.validate().map_err(|err| invalid(&err))?;
                let task = guard.run(self.tasks.create(&payload)).await??;
                Ok(json!({ "success": true, "taskId": task.id, "task": task }))
            }
            ToolName::UpdateTask => {
                let args: UpdateTaskArgs = parse_args(arguments)?;
                if args.patch.is_empty() {
                    return Err(ToolError::InvalidArguments("no fields to update".to_owned()));
                }
                let task = guard.run(self.tasks.update(&args.task_id, &args.patch)).await??;
                Ok(json!({ "success": true, "taskId": task.id, "task": task }))
            }
            ToolName::BatchUpdateTasks => {
                let args: BatchUpdateArgs = parse_args(arguments)?;
                let tasks = guard.run(self.tasks.batch_update(&args.updates)).await??;
                Ok(json!({ "success": true, "tasks": tasks }))
            }
            ToolName::ListTasks => {
                let filter: TaskFilter = parse_args(arguments)?;
                let tasks = guard.run(self.tasks.list(&filter)).await??;
                Ok(json!({ "success": true, "tasks": tasks }))
            }
            ToolName::CreateDocument => {
                let payload: NewDocument = parse_args(arguments)?;
                payload.validate().map_err(|err| invalid(&err))?;
                let document = guard.run(self.docs.create(&payload)).await??;
                Ok(json!({ "success": true, "docId": document.id, "document": document }))
            }
            ToolName::UpdateDocument => {
                let args: UpdateDocumentArgs = parse_args(arguments)?;
                let document = guard.run(self.docs.update(&args.doc_id, &args.patch)).await??;
                Ok(json!({ "success": true, "docId": document.id, "document": document }))
            }
            ToolName::ReadDocument => {
                let args: DocumentRef = parse_args(arguments)?;
                let document = guard
                    .run(self.docs.get_by_id(&args.doc_id))
                    .await??
                    .ok_or_else(|| {
                        WorkspaceProviderError::not_found(EntityKind::Document, args.doc_id.clone())
                    })?;
                Ok(json!({ "success": true, "docId": document.id, "document": document }))
            }
            ToolName::ListDocuments => {
                let documents = guard.run(self.docs.list()).await??;
                Ok(json!({ "success": true, "documents": documents }))
            }
            ToolName::CreateSprint => {
                let payload: NewSprint = parse_args(arguments)?;
                payload.validate().map_err(|err| invalid(&err))?;
                let sprint = guard.run(self.sprints.create(&payload)).await??;
                Ok(json!({ "success": true, "sprintId": sprint.id, "sprint": sprint }))
            }
            ToolName::ListSprints => {
                let sprints = guard.run(self.sprints.list()).await??;
                Ok(json!({ "success": true, "sprints": sprints }))
            }
            ToolName::PlanSprint => self.plan_sprint(arguments, guard).await,
            ToolName::CompileDocument => self.compile_document(arguments, guard).await,
        }
    }

    /// Moves existing tasks into an existing sprint.
    ///
    /// The task assignment goes through `batch_update`, so an unknown task id
    /// fails the whole call before the sprint records anything.
    async fn plan_sprint(&self, arguments: &Value, guard: &CallGuard) -> Result<Value, ToolError> {
        let plan: SprintPlan = parse_args(arguments)?;
        if guard.run(self.sprints.get_by_id(&plan.sprint_id)).await??.is_none() {
            return Err(
                WorkspaceProviderError::not_found(EntityKind::Sprint, plan.sprint_id.clone()).into(),
            );
        }
        let assignments: Vec<TaskUpdate> = plan
            .task_ids
            .iter()
            .map(|task_id| TaskUpdate {
                id: task_id.clone(),
                patch: TaskPatch {
                    sprint_id: Some(plan.sprint_id.clone()),
                    ..TaskPatch::default()
                },
            })
            .collect();
        let tasks = guard.run(self.tasks.batch_update(&assignments)).await??;
        let sprint = guard.run(self.sprints.plan(&plan)).await??;
        Ok(json!({ "success": true, "sprintId": sprint.id, "sprint": sprint, "tasks": tasks }))
    }

    async fn compile_document(&self, arguments: &Value, guard: &CallGuard) -> Result<Value, ToolError> {
        let compiler = self
            .compiler
            .as_ref()
            .ok_or(ToolError::Unsupported(ToolName::CompileDocument))?;
        let args: CompileDocumentArgs = parse_args(arguments)?;
        let document = guard
            .run(self.docs.get_by_id(&args.doc_id))
            .await??
            .ok_or_else(|| WorkspaceProviderError::not_found(EntityKind::Document, args.doc_id.clone()))?;
        let doc_type = args.doc_type.as_deref().unwrap_or(&document.doc_type);

        let output = compiler.compile(&document.content, doc_type, guard).await?;
        let tasks = compiler.persist(&output, self.tasks.as_ref(), guard).await?;
        Ok(json!({
            "success": true,
            "sourceDocId": document.id,
            "tasks": tasks,
            "warnings": output.warnings,
        }))
    }
}

fn parse_args<T: DeserializeOwned>(arguments: &Value) -> Result<T, ToolError> {
    let normalized = match arguments {
        Value::Null => json!({}),
        Value::String(raw) => serde_json::from_str(raw).map_err(|err| invalid(&err))?,
        other => other.clone(),
    };
    serde_json::from_value(normalized).map_err(|err| invalid(&err))
}

fn invalid(err: &dyn std::fmt::Display) -> ToolError {
    ToolError::InvalidArguments(err.to_string())
}
