//! The document compiler service.

use super::{CompilationOutput, CompiledTask};
use crate::external::{CallError, CallGuard};
use crate::extraction::parse_json_payload;
use crate::model::domain::{ModelMessage, ModelRequest};
use crate::model::ports::{ModelError, ModelProvider};
use crate::workspace::domain::{Task, WorkspaceDomainError};
use crate::workspace::ports::{TaskProvider, WorkspaceProviderError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

const COMPILER_INSTRUCTIONS: &str = "You are a senior engineering lead. Decompose the document \
into concrete engineering tasks. Each task needs a specific title, a detailed description, at \
least one acceptance criterion, an estimated complexity of low, medium or high, and the titles of \
any tasks it depends on. Report gaps or contradictions in the document as warnings.\n\
Reply with JSON only, shaped as {\"tasks\": [{\"title\": \"...\", \"description\": \"...\", \
\"acceptanceCriteria\": [\"...\"], \"estimatedComplexity\": \"medium\", \"dependencies\": []}], \
\"warnings\": []}.";

/// Errors raised while compiling or persisting a document.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    /// The model call failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The call was cancelled or timed out.
    #[error(transparent)]
    Call(#[from] CallError),

    /// The reply could not be parsed into a task list.
    #[error("compiler output could not be parsed: {reason}")]
    Parse {
        /// Parser error message.
        reason: String,
        /// The model's reply, verbatim.
        raw: String,
    },

    /// A compiled task could not be turned into a task payload.
    #[error(transparent)]
    InvalidTask(#[from] WorkspaceDomainError),

    /// The task provider rejected a compiled task.
    #[error(transparent)]
    Persist(#[from] WorkspaceProviderError),
}

impl CompileError {
    /// Returns the raw model output for parse failures.
    #[must_use]
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Parse { raw, .. } => Some(raw.as_str()),
            _ => None,
        }
    }

    /// Returns `true` when the error represents cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Call(CallError::Cancelled))
    }
}

/// Decomposes documents into engineering tasks with one model call.
#[derive(Clone)]
pub struct DocumentCompiler {
    model: Arc<dyn ModelProvider>,
}

impl DocumentCompiler {
    /// Creates a compiler backed by `model`.
    #[must_use]
    pub const fn new(model: Arc<dyn ModelProvider>) -> Self {
        Self { model }
    }

    /// Compiles `document` into a task list.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Parse`] with the raw reply when the output is
    /// not a task list, or the model or guard error when the call fails.
    #[instrument(skip(self, document, guard), fields(document_chars = document.len()))]
    pub async fn compile(
        &self,
        document: &str,
        doc_type: &str,
        guard: &CallGuard,
    ) -> Result<CompilationOutput, CompileError> {
        let request = ModelRequest::new(vec![
            ModelMessage::system(COMPILER_INSTRUCTIONS),
            ModelMessage::user(format!("Document type: {doc_type}\n\n{document}")),
        ])
        .json();

        let response = guard.run(self.model.invoke(request)).await??;
        let output = parse_output(&response.content).map_err(|reason| {
            warn!(%reason, "compiler reply was not a task list");
            CompileError::Parse {
                reason,
                raw: response.content.clone(),
            }
        })?;
        info!(
            tasks = output.tasks.len(),
            warnings = output.warnings.len(),
            "document compiled"
        );
        Ok(output)
    }

    /// Creates one task per compiled task, in order.
    ///
    /// Stops at the first failure; tasks created before it remain.
    ///
    /// # Errors
    ///
    /// Returns the first domain, provider or guard error encountered.
    pub async fn persist(
        &self,
        output: &CompilationOutput,
        tasks: &dyn TaskProvider,
        guard: &CallGuard,
    ) -> Result<Vec<Task>, CompileError> {
        let mut created = Vec::with_capacity(output.tasks.len());
        for compiled in &output.tasks {
            let payload = compiled.to_new_task()?;
            created.push(guard.run(tasks.create(&payload)).await??);
        }
        Ok(created)
    }
}

fn parse_output(raw: &str) -> Result<CompilationOutput, String> {
    parse_json_payload::<CompilationOutput>(raw).or_else(|object_err| {
        parse_json_payload::<Vec<CompiledTask>>(raw)
            .map(|tasks| CompilationOutput {
                tasks,
                warnings: Vec::new(),
            })
            .map_err(|_| object_err.to_string())
    })
}
