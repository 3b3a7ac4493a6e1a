//! Renders system prompts and model transcripts from conversation state.

use crate::conversation::domain::{AgentState, ChatMessage, ChatRole};
use crate::extraction::{SUGGESTIONS_CLOSE, SUGGESTIONS_OPEN};
use crate::manifest::domain::{ManifestField, ProjectManifest, REQUIRED_FIELDS};
use crate::model::domain::ModelMessage;
use minijinja::Environment;
use serde_json::{Value, json};
use thiserror::Error;

/// Rules included in every tool-using system prompt.
pub const STANDARDS_OF_WORK: [&str; 5] = [
    "Every task you create needs a detailed description and a Markdown acceptance checklist.",
    "Use only ids returned by tools or listed under entities created this session.",
    "Prefer updating an existing task or document over creating a duplicate.",
    "Create tasks one concern at a time; split anything larger than a few days of work.",
    "Report tool failures honestly instead of claiming success.",
];

const SYSTEM_TEMPLATE: &str = "You are Atelier, the project assistant for {{ project }}.

## Project manifest ({{ completeness }}% complete)
{% for field in fields %}- {{ field.label }}: {{ field.value }}
{% endfor %}{% if missing %}Still missing: {{ missing | join(\", \") }}
{% endif %}{% if summary %}Summary: {{ summary }}
{% endif %}
## Standards of work
{% for rule in standards %}- {{ rule }}
{% endfor %}{% if entities %}
## Entities created this session
Refer to these by their exact ids and never invent new ones.
{% for entity in entities %}- {{ entity.kind }} {{ entity.id }}: {{ entity.title }}
{% endfor %}{% endif %}{% if notes %}
## Working notes
{% for note in notes %}- {{ note }}
{% endfor %}{% endif %}
## Current focus: {{ mode }}
{{ instructions }}
{% if suggestions %}
{{ suggestions }}{% endif %}";

const INTERVIEW_TEMPLATE: &str = "You are Atelier, interviewing the user to build a profile of \
their project so later work can be planned well.

## What is known so far ({{ completeness }}% complete)
{% for field in fields %}- {{ field.name }}: {{ field.value }}
{% endfor %}
## Still missing
{% for name in missing %}- {{ name }}
{% else %}- nothing, the profile is complete
{% endfor %}
Merge any facts from the user's latest message into the profile. Mark a field as complete only \
when its answer is specific enough to plan work from; vague answers stay open. Then ask one \
focused question about the most important missing field, and offer up to three quick replies.
{% if phases %}Valid phases: {{ phases | join(\", \") }}.
{% endif %}
Reply with JSON only:
{\"manifestUpdates\": {\"name\": \"...\", \"mission\": \"...\", \"targetUsers\": [], \"techStack\": [], \
\"phase\": \"planning\", \"features\": [], \"competitors\": [], \"brandVoice\": \"...\", \"successMetrics\": []}, \
\"completedFields\": [\"name\"], \"question\": \"...\", \"suggestions\": [{\"label\": \"...\", \"text\": \"...\"}]}
Omit manifest fields the user did not mention.";

/// Errors raised while rendering prompts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The prompt template failed to render.
    #[error("failed to render prompt: {0}")]
    TemplateRender(String),
}

/// Builds system prompts and transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBuilder {
    history_window: usize,
}

impl ContextBuilder {
    /// Creates a builder that includes the last `history_window` messages in
    /// transcripts.
    #[must_use]
    pub const fn new(history_window: usize) -> Self {
        Self { history_window }
    }

    /// Renders the system prompt for a workflow.
    ///
    /// `include_entities` adds the entities created earlier in the session,
    /// together with the working notes.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::TemplateRender`] when the template fails.
    pub fn system_prompt(
        &self,
        state: &AgentState,
        instructions: &str,
        include_entities: bool,
    ) -> Result<String, ContextError> {
        let manifest = state.manifest();
        let workflow = state.workflow();
        let entities: Vec<Value> = if include_entities {
            workflow
                .map(|current| current.created_entities())
                .unwrap_or_default()
                .iter()
                .map(|entity| {
                    json!({
                        "kind": entity.kind.to_string(),
                        "id": entity.id.as_str(),
                        "title": entity.title,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };
        let notes: &[String] = if include_entities {
            state.scratchpad()
        } else {
            &[]
        };
        let project = if manifest.name.trim().is_empty() {
            "a new project"
        } else {
            manifest.name.trim()
        };

        let context = json!({
            "project": project,
            "completeness": manifest.completeness_score(),
            "fields": REQUIRED_FIELDS
                .iter()
                .map(|field| json!({ "label": field_label(*field), "value": field_value(manifest, *field) }))
                .collect::<Vec<_>>(),
            "missing": state.missing_info().iter().map(|field| field_label(*field)).collect::<Vec<_>>(),
            "summary": workflow.map(|current| current.manifest_summary()).unwrap_or_default(),
            "standards": STANDARDS_OF_WORK,
            "entities": entities,
            "notes": notes,
            "mode": state.mode().as_str(),
            "instructions": instructions.trim(),
            "suggestions": suggestions_instructions(),
        });

        Environment::new()
            .render_str(SYSTEM_TEMPLATE, context)
            .map_err(|err| ContextError::TemplateRender(err.to_string()))
    }

    /// Renders the system prompt for an interview turn.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::TemplateRender`] when the template fails.
    pub fn interview_prompt(&self, state: &AgentState) -> Result<String, ContextError> {
        let manifest = state.manifest();
        let context = json!({
            "completeness": manifest.completeness_score(),
            "fields": REQUIRED_FIELDS
                .iter()
                .map(|field| json!({ "name": field.as_str(), "value": field_value(manifest, *field) }))
                .collect::<Vec<_>>(),
            "missing": state.missing_info().iter().map(|field| field.as_str()).collect::<Vec<_>>(),
            "phases": ["planning", "build", "scaling", "maintenance"],
        });
        Environment::new()
            .render_str(INTERVIEW_TEMPLATE, context)
            .map_err(|err| ContextError::TemplateRender(err.to_string()))
    }

    /// Assembles the transcript: the system prompt, the recent history window
    /// and the new input, in that order.
    #[must_use]
    pub fn build_messages(
        &self,
        history: &[ChatMessage],
        system: Option<&str>,
        input: &str,
    ) -> Vec<ModelMessage> {
        let skip = history.len().saturating_sub(self.history_window);
        let mut messages = Vec::with_capacity(history.len().saturating_sub(skip).saturating_add(2));
        if let Some(prompt) = system {
            messages.push(ModelMessage::system(prompt));
        }
        messages.extend(history.iter().skip(skip).map(|message| match message.role() {
            ChatRole::User => ModelMessage::user(message.content()),
            ChatRole::Assistant => ModelMessage::assistant(message.content()),
        }));
        messages.push(ModelMessage::user(input));
        messages
    }
}

fn suggestions_instructions() -> String {
    format!(
        "Finish every reply with up to three follow-up suggestions the user could send next, \
         formatted as {SUGGESTIONS_OPEN}[{{\"label\": \"short label\", \"text\": \"message to send\"}}]{SUGGESTIONS_CLOSE}."
    )
}

fn field_label(field: ManifestField) -> String {
    field.as_str().replace('_', " ")
}

fn field_value(manifest: &ProjectManifest, field: ManifestField) -> String {
    fn scalar(value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            "(unknown)".to_owned()
        } else {
            trimmed.to_owned()
        }
    }
    fn list(values: &[String]) -> String {
        scalar(&values.join(", "))
    }
    match field {
        ManifestField::Name => scalar(&manifest.name),
        ManifestField::Mission => scalar(&manifest.mission),
        ManifestField::TargetUsers => list(&manifest.target_users),
        ManifestField::TechStack => list(&manifest.tech_stack),
        ManifestField::Phase => manifest
            .phase
            .map_or_else(|| scalar(""), |phase| phase.to_string()),
        ManifestField::Features => list(&manifest.features),
        ManifestField::Competitors => list(&manifest.competitors),
        ManifestField::BrandVoice => scalar(&manifest.brand_voice),
        ManifestField::SuccessMetrics => list(&manifest.success_metrics),
    }
}
