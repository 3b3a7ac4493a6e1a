//! Best-effort mapping from tool results to artifacts.
//!
//! Tool results are parsed defensively: anything that is not JSON, or does
//! not carry a recognised id or list field, simply yields no artifacts.

use super::ToolName;
use crate::conversation::domain::Artifact;
use crate::workspace::domain::{EntityId, EntityKind};
use serde_json::{Map, Value, json};

/// Artifacts and newly created entities found in one tool result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResult {
    /// Artifacts in result order.
    pub artifacts: Vec<Artifact>,
    /// Entities the call created, as `(id, kind, title)`.
    pub created: Vec<(EntityId, EntityKind, String)>,
    /// The result carried `"success": false`.
    pub reported_failure: bool,
}

const SINGLE_FIELDS: [(&str, &str, EntityKind); 3] = [
    ("taskId", "task", EntityKind::Task),
    ("docId", "document", EntityKind::Document),
    ("sprintId", "sprint", EntityKind::Sprint),
];

const LIST_FIELDS: [(&str, EntityKind); 3] = [
    ("tasks", EntityKind::Task),
    ("documents", EntityKind::Document),
    ("sprints", EntityKind::Sprint),
];

/// Extracts artifacts from a raw tool result.
#[must_use]
pub fn parse_result(tool: ToolName, raw: &str) -> ParsedResult {
    let Ok(Value::Object(result)) = serde_json::from_str::<Value>(raw) else {
        return ParsedResult::default();
    };
    if result.get("success").and_then(Value::as_bool) == Some(false) {
        return ParsedResult {
            reported_failure: true,
            ..ParsedResult::default()
        };
    }

    let mut artifacts = Vec::new();
    for (id_key, object_key, kind) in SINGLE_FIELDS {
        if let Some(artifact) = single_artifact(&result, id_key, object_key, kind) {
            artifacts.push(artifact);
        }
    }
    for (list_key, kind) in LIST_FIELDS {
        if let Some(items) = result.get(list_key).and_then(Value::as_array) {
            artifacts.extend(items.iter().filter_map(|item| entity_artifact(kind, item)));
        }
    }

    let created = if creates_entities(tool) {
        artifacts
            .iter()
            .filter(|artifact| tool != ToolName::CompileDocument || artifact.kind == EntityKind::Task)
            .map(|artifact| (artifact.id.clone(), artifact.kind, artifact.title.clone()))
            .collect()
    } else {
        Vec::new()
    };
    ParsedResult {
        artifacts,
        created,
        reported_failure: false,
    }
}

const fn creates_entities(tool: ToolName) -> bool {
    matches!(
        tool,
        ToolName::CreateTask
            | ToolName::CreateDocument
            | ToolName::CreateSprint
            | ToolName::CompileDocument
    )
}

fn single_artifact(
    result: &Map<String, Value>,
    id_key: &str,
    object_key: &str,
    kind: EntityKind,
) -> Option<Artifact> {
    if let Some(artifact) = result
        .get(object_key)
        .and_then(|object| entity_artifact(kind, object))
    {
        return Some(artifact);
    }
    let id = result
        .get(id_key)
        .and_then(Value::as_str)
        .and_then(|raw| EntityId::new(raw).ok())?;
    Some(Artifact {
        title: format!("{} {id}", kind_label(kind)),
        id,
        kind,
        content: String::new(),
        metadata: None,
    })
}

fn entity_artifact(kind: EntityKind, value: &Value) -> Option<Artifact> {
    let id = text(value, "id").and_then(|raw| EntityId::new(raw).ok())?;
    let title_key = if kind == EntityKind::Sprint { "name" } else { "title" };
    let title = text(value, title_key)
        .map_or_else(|| format!("{} {id}", kind_label(kind)), str::to_owned);
    let (content, metadata) = match kind {
        EntityKind::Task => (
            text(value, "description").unwrap_or_default().to_owned(),
            json!({
                "status": value.get("status"),
                "priority": value.get("priority"),
                "sprintId": value.get("sprintId"),
            }),
        ),
        EntityKind::Document => (
            text(value, "content").unwrap_or_default().to_owned(),
            json!({
                "docType": value.get("docType"),
                "parentId": value.get("parentId"),
            }),
        ),
        EntityKind::Sprint => (
            sprint_content(value),
            json!({
                "startDate": value.get("startDate"),
                "endDate": value.get("endDate"),
                "taskIds": value.get("taskIds"),
            }),
        ),
    };
    Some(Artifact {
        id,
        kind,
        title,
        content,
        metadata: Some(metadata),
    })
}

fn sprint_content(value: &Value) -> String {
    let mut lines = Vec::new();
    if let Some(name) = text(value, "name") {
        lines.push(format!("Sprint: {name}"));
    }
    match (text(value, "startDate"), text(value, "endDate")) {
        (Some(start), Some(end)) => lines.push(format!("Dates: {start} to {end}")),
        (Some(start), None) => lines.push(format!("Starts: {start}")),
        (None, Some(end)) => lines.push(format!("Ends: {end}")),
        (None, None) => {}
    }
    if let Some(goal) = text(value, "goal") {
        lines.push(format!("Goal: {goal}"));
    }
    lines.join("\n")
}

fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|raw| !raw.trim().is_empty())
}

const fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Task => "Task",
        EntityKind::Document => "Document",
        EntityKind::Sprint => "Sprint",
    }
}
