//! The tool catalogue and per-workflow tool sets.

use crate::model::domain::ToolSpec;
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

/// A tool the model may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolName {
    /// Create one task.
    CreateTask,
    /// Update one task.
    UpdateTask,
    /// Update several tasks at once.
    BatchUpdateTasks,
    /// List tasks, optionally filtered.
    ListTasks,
    /// Create a document.
    CreateDocument,
    /// Update a document.
    UpdateDocument,
    /// Read one document.
    ReadDocument,
    /// List documents.
    ListDocuments,
    /// Create a sprint.
    CreateSprint,
    /// List sprints.
    ListSprints,
    /// Move tasks into a sprint.
    PlanSprint,
    /// Compile a stored document into tasks.
    CompileDocument,
}

/// Error returned when a tool name is not in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool: {0}")]
pub struct UnknownToolError(pub String);

impl ToolName {
    /// Every tool, in catalogue order.
    pub const ALL: [Self; 12] = [
        Self::CreateTask,
        Self::UpdateTask,
        Self::BatchUpdateTasks,
        Self::ListTasks,
        Self::CreateDocument,
        Self::UpdateDocument,
        Self::ReadDocument,
        Self::ListDocuments,
        Self::CreateSprint,
        Self::ListSprints,
        Self::PlanSprint,
        Self::CompileDocument,
    ];

    /// Returns the function name exposed to the model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::UpdateTask => "update_task",
            Self::BatchUpdateTasks => "batch_update_tasks",
            Self::ListTasks => "list_tasks",
            Self::CreateDocument => "create_document",
            Self::UpdateDocument => "update_document",
            Self::ReadDocument => "read_document",
            Self::ListDocuments => "list_documents",
            Self::CreateSprint => "create_sprint",
            Self::ListSprints => "list_sprints",
            Self::PlanSprint => "plan_sprint",
            Self::CompileDocument => "compile_document",
        }
    }

    /// Returns `true` for tools that only read.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::ListTasks | Self::ReadDocument | Self::ListDocuments | Self::ListSprints
        )
    }

    const fn description(self) -> &'static str {
        match self {
            Self::CreateTask => {
                "Create a task. Give it a detailed description and an acceptance checklist."
            }
            Self::UpdateTask => "Update fields of an existing task by its id.",
            Self::BatchUpdateTasks => {
                "Update several tasks at once. All updates are applied or none are."
            }
            Self::ListTasks => "List tasks, optionally filtered by status or sprint.",
            Self::CreateDocument => "Create a document with a title, Markdown content and type.",
            Self::UpdateDocument => "Update the title or content of a document by its id.",
            Self::ReadDocument => "Read the full content of a document by its id.",
            Self::ListDocuments => "List all documents.",
            Self::CreateSprint => "Create a sprint with a name, optional goal and dates.",
            Self::ListSprints => "List all sprints.",
            Self::PlanSprint => "Move existing tasks into a sprint.",
            Self::CompileDocument => {
                "Break a stored document into engineering tasks and create them."
            }
        }
    }

    fn parameters(self) -> Value {
        let status = json!({ "type": "string", "enum": ["todo", "in_progress", "review", "done"] });
        let priority = json!({ "type": "string", "enum": ["low", "medium", "high"] });
        let patch = json!({
            "title": { "type": "string" },
            "description": { "type": "string" },
            "status": status,
            "priority": priority,
            "sprintId": { "type": "string" }
        });
        match self {
            Self::CreateTask => object(
                json!({
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "status": status,
                    "priority": priority,
                    "sprintId": { "type": "string" }
                }),
                &["title"],
            ),
            Self::UpdateTask => {
                let mut properties = patch;
                if let Some(map) = properties.as_object_mut() {
                    map.insert("taskId".to_owned(), json!({ "type": "string" }));
                }
                object(properties, &["taskId"])
            }
            Self::BatchUpdateTasks => {
                let mut item = patch;
                if let Some(map) = item.as_object_mut() {
                    map.insert("id".to_owned(), json!({ "type": "string" }));
                }
                object(
                    json!({ "updates": { "type": "array", "items": object(item, &["id"]) } }),
                    &["updates"],
                )
            }
            Self::ListTasks => object(
                json!({ "status": status, "sprintId": { "type": "string" } }),
                &[],
            ),
            Self::CreateDocument => object(
                json!({
                    "title": { "type": "string" },
                    "content": { "type": "string" },
                    "docType": { "type": "string" },
                    "parentId": { "type": "string" }
                }),
                &["title", "content"],
            ),
            Self::UpdateDocument => object(
                json!({
                    "docId": { "type": "string" },
                    "title": { "type": "string" },
                    "content": { "type": "string" }
                }),
                &["docId"],
            ),
            Self::ReadDocument => object(json!({ "docId": { "type": "string" } }), &["docId"]),
            Self::ListDocuments | Self::ListSprints => object(json!({}), &[]),
            Self::CreateSprint => object(
                json!({
                    "name": { "type": "string" },
                    "goal": { "type": "string" },
                    "startDate": { "type": "string", "format": "date" },
                    "endDate": { "type": "string", "format": "date" }
                }),
                &["name"],
            ),
            Self::PlanSprint => object(
                json!({
                    "sprintId": { "type": "string" },
                    "taskIds": { "type": "array", "items": { "type": "string" } }
                }),
                &["sprintId", "taskIds"],
            ),
            Self::CompileDocument => object(
                json!({
                    "docId": { "type": "string" },
                    "docType": { "type": "string" }
                }),
                &["docId"],
            ),
        }
    }

    /// Returns the function specification sent to the model.
    #[must_use]
    pub fn spec(self) -> ToolSpec {
        ToolSpec {
            name: self.as_str().to_owned(),
            description: self.description().to_owned(),
            parameters: self.parameters(),
        }
    }
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ToolName {
    type Error = UnknownToolError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == value.trim())
            .ok_or_else(|| UnknownToolError(value.to_owned()))
    }
}

/// The tools a workflow exposes to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSet {
    tools: Vec<ToolName>,
}

impl ToolSet {
    /// Creates a set from the given tools, dropping duplicates.
    #[must_use]
    pub fn new(tools: impl IntoIterator<Item = ToolName>) -> Self {
        let mut unique: Vec<ToolName> = Vec::new();
        for tool in tools {
            if !unique.contains(&tool) {
                unique.push(tool);
            }
        }
        Self { tools: unique }
    }

    /// An empty set.
    #[must_use]
    pub const fn none() -> Self {
        Self { tools: Vec::new() }
    }

    /// Every tool in the catalogue.
    #[must_use]
    pub fn full() -> Self {
        Self::new(ToolName::ALL)
    }

    /// Listing and reading tools only.
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(ToolName::ALL.into_iter().filter(|tool| tool.is_read_only()))
    }

    /// Task and document capture, for brainstorming.
    #[must_use]
    pub fn idea() -> Self {
        Self::new([
            ToolName::CreateTask,
            ToolName::ListTasks,
            ToolName::CreateDocument,
            ToolName::ListDocuments,
        ])
    }

    /// Everything except the document compiler.
    #[must_use]
    pub fn documenting() -> Self {
        Self::new(
            ToolName::ALL
                .into_iter()
                .filter(|tool| *tool != ToolName::CompileDocument),
        )
    }

    /// Document reading plus the compiler.
    #[must_use]
    pub fn compiling() -> Self {
        Self::new([
            ToolName::ReadDocument,
            ToolName::ListDocuments,
            ToolName::ListTasks,
            ToolName::CompileDocument,
        ])
    }

    /// Sprint and task tools.
    #[must_use]
    pub fn planning() -> Self {
        Self::new([
            ToolName::CreateSprint,
            ToolName::ListSprints,
            ToolName::PlanSprint,
            ToolName::CreateTask,
            ToolName::UpdateTask,
            ToolName::BatchUpdateTasks,
            ToolName::ListTasks,
        ])
    }

    /// Returns `true` when `tool` is in the set.
    #[must_use]
    pub fn contains(&self, tool: ToolName) -> bool {
        self.tools.contains(&tool)
    }

    /// Looks up a tool by the name the model used, if it is in the set.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ToolName> {
        ToolName::try_from(name)
            .ok()
            .filter(|tool| self.contains(*tool))
    }

    /// Returns `true` when the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Iterates over the tools in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ToolName> + '_ {
        self.tools.iter().copied()
    }

    /// Returns the specifications for every tool in the set.
    #[must_use]
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.iter().map(ToolName::spec).collect()
    }
}
