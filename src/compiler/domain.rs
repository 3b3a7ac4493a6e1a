//! Compiler output types.

use crate::workspace::domain::{NewTask, TaskPriority, WorkspaceDomainError};
use serde::{Deserialize, Serialize};

/// Estimated effort of a compiled task.
///
/// Deserialisation is lenient: unknown labels become [`Complexity::Medium`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Complexity {
    /// Small, well-understood work.
    Low,
    /// Typical work.
    #[default]
    Medium,
    /// Large or risky work.
    High,
}

impl From<String> for Complexity {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "small" | "easy" => Self::Low,
            "high" | "large" | "hard" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl Complexity {
    /// Maps complexity onto task priority: high to high, low to low, and
    /// everything else to medium.
    #[must_use]
    pub const fn priority(self) -> TaskPriority {
        match self {
            Self::High => TaskPriority::High,
            Self::Low => TaskPriority::Low,
            Self::Medium => TaskPriority::Medium,
        }
    }
}

/// One task proposed by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledTask {
    /// Task title.
    pub title: String,
    /// Task description.
    #[serde(default)]
    pub description: String,
    /// Checklist items that define done.
    #[serde(default, alias = "acceptance_criteria")]
    pub acceptance_criteria: Vec<String>,
    /// Estimated effort.
    #[serde(default, alias = "estimated_complexity")]
    pub estimated_complexity: Complexity,
    /// Titles of tasks this one depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl CompiledTask {
    /// Returns the priority the persisted task receives.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.estimated_complexity.priority()
    }

    /// Builds the task payload, appending acceptance criteria and
    /// dependencies to the description.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyTitle`] when the title is blank.
    pub fn to_new_task(&self) -> Result<NewTask, WorkspaceDomainError> {
        let mut description = self.description.trim().to_owned();
        if !self.acceptance_criteria.is_empty() {
            description.push_str("\n\n## Acceptance Criteria");
            for criterion in &self.acceptance_criteria {
                description.push_str("\n- [ ] ");
                description.push_str(criterion.trim());
            }
        }
        if !self.dependencies.is_empty() {
            description.push_str("\n\nDepends on: ");
            description.push_str(&self.dependencies.join(", "));
        }
        Ok(NewTask::new(self.title.trim())?
            .with_description(description.trim_start())
            .with_priority(self.priority()))
    }
}

/// Everything the compiler produced for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationOutput {
    /// Proposed tasks, in document order.
    #[serde(default)]
    pub tasks: Vec<CompiledTask>,
    /// Problems the compiler noticed in the document.
    #[serde(default)]
    pub warnings: Vec<String>,
}
