//! The manifest interview: one structured model call per turn.

use super::{
    LoopTermination, TurnContext, Workflow, WorkflowError, WorkflowKind, WorkflowOutput, accepts,
};
use crate::context::ContextBuilder;
use crate::conversation::domain::{AgentState, Mode, SuggestedAction};
use crate::extraction::{
    SuggestionExtraction, extract_suggestions, optional_text, parse_json_payload, string_list,
    unwrap_fenced,
};
use crate::intent::Intent;
use crate::manifest::domain::{ManifestField, ManifestUpdate};
use crate::model::domain::ModelRequest;
use crate::model::ports::ModelProvider;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const COMPLETE_REPLY: &str = "The project profile is complete. What would you like to work on next?";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InterviewReply {
    #[serde(default, alias = "manifest_updates", alias = "updates")]
    manifest_updates: ManifestUpdate,
    #[serde(default, alias = "completed_fields", deserialize_with = "string_list")]
    completed_fields: Vec<String>,
    #[serde(default, deserialize_with = "optional_text")]
    question: Option<String>,
    #[serde(default, deserialize_with = "suggestion_list")]
    suggestions: Vec<ReplySuggestion>,
}

impl InterviewReply {
    fn is_structured(&self) -> bool {
        self.question.is_some()
            || !self.completed_fields.is_empty()
            || self.manifest_updates != ManifestUpdate::default()
    }
}

#[derive(Debug, Deserialize)]
struct ReplySuggestion {
    #[serde(default)]
    label: Option<String>,
    text: String,
}

/// Accepts suggestions as objects or bare strings; anything else is dropped.
fn suggestion_list<'de, D>(deserializer: D) -> Result<Vec<ReplySuggestion>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(ReplySuggestion { label: None, text }),
            other => serde_json::from_value(other).ok(),
        })
        .collect())
}

/// Reads the structured reply out of `text`, which has already had its
/// suggestions block removed.
///
/// Only a JSON object counts. An object found inside prose must carry at
/// least one interview field, so stray braces in a plain answer are not
/// mistaken for an empty reply.
fn parse_reply(text: &str) -> Option<InterviewReply> {
    let body = unwrap_fenced(text);
    let fields = match parse_json_payload::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        _ => return None,
    };
    let reply: InterviewReply = serde_json::from_value(Value::Object(fields))
        .inspect_err(|err| debug!(error = %err, "interview object did not fit the reply shape"))
        .ok()?;
    (body.starts_with('{') || reply.is_structured()).then_some(reply)
}

fn looks_like_json(text: &str) -> bool {
    let body = unwrap_fenced(text);
    body.starts_with('{') || body.starts_with('[')
}

/// Fills in the project manifest over several turns.
pub struct InterviewWorkflow {
    model: Arc<dyn ModelProvider>,
    context: ContextBuilder,
}

impl InterviewWorkflow {
    /// Creates the workflow.
    #[must_use]
    pub const fn new(model: Arc<dyn ModelProvider>, context: ContextBuilder) -> Self {
        Self { model, context }
    }
}

#[async_trait]
impl Workflow for InterviewWorkflow {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::Interview
    }

    fn mode(&self) -> Mode {
        Mode::Interview
    }

    fn supports(&self, intent: Intent, mode: Mode) -> bool {
        accepts(Intent::Interview, Mode::Interview, intent, mode)
    }

    #[instrument(skip_all, fields(missing = state.missing_info().len()))]
    async fn execute(
        &self,
        state: &mut AgentState,
        turn: &TurnContext<'_>,
    ) -> Result<WorkflowOutput, WorkflowError> {
        let system = self.context.interview_prompt(state)?;
        let messages = self
            .context
            .build_messages(state.history(), Some(&system), turn.input);
        let mut request = ModelRequest::new(messages);
        if self.model.capabilities().supports_json_mode() {
            request = request.json();
        }
        let response = turn.guard.run(self.model.invoke(request)).await??;

        let extraction = extract_suggestions(&response.content);
        let Some(reply) = parse_reply(&extraction.content) else {
            return Ok(plain_reply(state, extraction));
        };

        let judged: Vec<ManifestField> = reply
            .completed_fields
            .iter()
            .filter_map(|name| {
                ManifestField::try_from(name.as_str())
                    .inspect_err(|err| debug!(error = %err, "ignoring unknown completed field"))
                    .ok()
            })
            .collect();
        let progress = state.apply_interview(&reply.manifest_updates, &judged);
        info!(
            completed = ?progress.newly_completed,
            score = progress.completeness_score,
            "manifest updated"
        );

        let content = reply
            .question
            .map(|question| question.trim().to_owned())
            .filter(|question| !question.is_empty())
            .unwrap_or_else(|| fallback_question(state));
        let structured: Vec<SuggestedAction> = reply
            .suggestions
            .into_iter()
            .filter(|entry| !entry.text.trim().is_empty())
            .map(|entry| {
                let label = entry
                    .label
                    .filter(|label| !label.trim().is_empty())
                    .unwrap_or_else(|| entry.text.clone());
                SuggestedAction::chat(label, entry.text)
            })
            .collect();
        let suggested_actions = if structured.is_empty() {
            extraction.actions
        } else {
            structured
        };

        Ok(WorkflowOutput {
            content,
            artifacts: Vec::new(),
            suggested_actions,
            observations: Vec::new(),
            termination: LoopTermination::Completed,
            model_invocations: 1,
        })
    }
}

/// Answers a turn whose reply carried no interview object.
///
/// Prose is passed through with its suggestions. A JSON-looking reply that
/// did not parse is never shown; the next missing field is asked about
/// instead.
fn plain_reply(state: &AgentState, extraction: SuggestionExtraction) -> WorkflowOutput {
    let text = extraction.content.trim();
    let content = if text.is_empty() || looks_like_json(text) {
        warn!("interview reply carried no usable reply object, asking the next question");
        fallback_question(state)
    } else {
        warn!("interview reply was not JSON, using it as plain text");
        text.to_owned()
    };
    WorkflowOutput {
        content,
        suggested_actions: extraction.actions,
        model_invocations: 1,
        ..WorkflowOutput::default()
    }
}

fn fallback_question(state: &AgentState) -> String {
    state.missing_info().first().map_or_else(
        || COMPLETE_REPLY.to_owned(),
        |field| {
            format!(
                "Tell me about the project's {}.",
                field.as_str().replace('_', " ")
            )
        },
    )
}
