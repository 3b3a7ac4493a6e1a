//! Sprint records exchanged with the sprint provider.

use super::{EntityId, WorkspaceDomainError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A sprint as stored by the sprint provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    /// Provider-assigned identifier.
    pub id: EntityId,
    /// Sprint name.
    pub name: String,
    /// Sprint goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// First day of the sprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day of the sprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Tasks planned into the sprint.
    #[serde(default)]
    pub task_ids: Vec<EntityId>,
}

/// Creation payload for a sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSprint {
    /// Sprint name.
    pub name: String,
    /// Sprint goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// First day of the sprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day of the sprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl NewSprint {
    /// Validates a payload that arrived through deserialisation.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyTitle`] when the name is blank.
    pub fn validate(&self) -> Result<(), WorkspaceDomainError> {
        if self.name.trim().is_empty() {
            return Err(WorkspaceDomainError::EmptyTitle("sprint"));
        }
        Ok(())
    }
}

/// Request to move a set of tasks into a sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintPlan {
    /// Target sprint.
    pub sprint_id: EntityId,
    /// Tasks to plan into it.
    pub task_ids: Vec<EntityId>,
}
