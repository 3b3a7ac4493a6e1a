//! Sequential execution of model-requested tool calls.

use super::artifacts::parse_result;
use super::{ToolSet, WorkspaceToolbox};
use crate::conversation::domain::{ArtifactSet, CreatedEntity};
use crate::external::{CallError, CallGuard};
use crate::model::domain::ToolCallRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

const OBSERVATION_PREVIEW_CHARS: usize = 4_000;

/// How a single tool call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The tool ran and returned a result.
    Succeeded,
    /// The tool ran and failed.
    Failed,
    /// The model asked for a tool outside the active set.
    Unavailable,
}

/// A human-readable record of one tool call, fed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolObservation {
    /// Provider call identifier.
    pub call_id: String,
    /// Tool name as requested by the model.
    pub tool: String,
    /// How the call ended.
    pub outcome: ToolOutcome,
    /// The tool result or failure description.
    pub text: String,
}

impl ToolObservation {
    fn render(&self) -> String {
        let status = match self.outcome {
            ToolOutcome::Succeeded => "ok",
            ToolOutcome::Failed => "failed",
            ToolOutcome::Unavailable => "not available",
        };
        let preview: String = self.text.chars().take(OBSERVATION_PREVIEW_CHARS).collect();
        format!("[{}] {} ({status}): {preview}", self.call_id, self.tool)
    }
}

/// Everything one round of tool calls produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolRound {
    /// One observation per requested call, in request order.
    pub observations: Vec<ToolObservation>,
    /// Artifacts, unique by id.
    pub artifacts: ArtifactSet,
    /// Entities created by the round.
    pub created: Vec<CreatedEntity>,
}

impl ToolRound {
    /// Renders the synthetic observation turn appended to the transcript.
    #[must_use]
    pub fn observation_message(&self) -> String {
        let mut message = String::from("Tool results:");
        for observation in &self.observations {
            message.push('\n');
            message.push_str(&observation.render());
        }
        message
    }

    /// Returns how many calls failed or were unavailable.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.observations
            .iter()
            .filter(|observation| observation.outcome != ToolOutcome::Succeeded)
            .count()
    }
}

/// Runs tool calls one after another against a [`WorkspaceToolbox`].
#[derive(Clone)]
pub struct ToolExecutor {
    toolbox: WorkspaceToolbox,
}

impl ToolExecutor {
    /// Creates an executor over `toolbox`.
    #[must_use]
    pub const fn new(toolbox: WorkspaceToolbox) -> Self {
        Self { toolbox }
    }

    /// Executes `calls` in order, restricted to `tools`.
    ///
    /// A failing call becomes a failure observation and the round carries
    /// on; later calls still see the side effects of earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Cancelled`] when the turn is cancelled. No other
    /// failure escapes.
    #[instrument(skip_all, fields(calls = calls.len()))]
    pub async fn execute(
        &self,
        calls: &[ToolCallRequest],
        tools: &ToolSet,
        guard: &CallGuard,
        now: DateTime<Utc>,
    ) -> Result<ToolRound, CallError> {
        let mut round = ToolRound::default();
        for call in calls {
            if guard.is_cancelled() {
                return Err(CallError::Cancelled);
            }
            let Some(tool) = tools.resolve(&call.name) else {
                warn!(tool = %call.name, "model requested a tool outside the active set");
                round.observations.push(ToolObservation {
                    call_id: call.id.clone(),
                    tool: call.name.clone(),
                    outcome: ToolOutcome::Unavailable,
                    text: format!("Tool '{}' is not available in this context.", call.name),
                });
                continue;
            };

            match self.toolbox.call(tool, &call.arguments, guard).await {
                Ok(raw) => {
                    let parsed = parse_result(tool, &raw);
                    let outcome = if parsed.reported_failure {
                        warn!(%tool, call_id = %call.id, result = %raw, "tool reported failure");
                        ToolOutcome::Failed
                    } else {
                        info!(%tool, call_id = %call.id, "tool call succeeded");
                        ToolOutcome::Succeeded
                    };
                    round.artifacts.extend(parsed.artifacts);
                    round.created.extend(parsed.created.into_iter().map(|(id, kind, title)| {
                        CreatedEntity {
                            id,
                            kind,
                            title,
                            created_at: now,
                        }
                    }));
                    round.observations.push(ToolObservation {
                        call_id: call.id.clone(),
                        tool: call.name.clone(),
                        outcome,
                        text: raw,
                    });
                }
                Err(err) if err.is_cancelled() => return Err(CallError::Cancelled),
                Err(err) => {
                    warn!(%tool, call_id = %call.id, error = %err, "tool call failed");
                    let mut text = format!("Error executing {tool}: {err}");
                    if let Some(raw) = err.raw_output() {
                        text.push_str("\nModel output: ");
                        text.push_str(raw);
                    }
                    round.observations.push(ToolObservation {
                        call_id: call.id.clone(),
                        tool: call.name.clone(),
                        outcome: ToolOutcome::Failed,
                        text,
                    });
                }
            }
        }
        Ok(round)
    }
}
