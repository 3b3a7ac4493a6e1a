//! Document records exchanged with the document provider.

use super::{EntityId, WorkspaceDomainError};
use serde::{Deserialize, Serialize};

/// A document as stored by the document provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Provider-assigned identifier.
    pub id: EntityId,
    /// Document title.
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
    /// Free-form document type label such as `prd` or `rfc`.
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    /// Parent document in the tree, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
}

fn default_doc_type() -> String {
    "note".to_owned()
}

/// Creation payload for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    /// Document title.
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
    /// Document type label.
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    /// Parent document in the tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
}

impl NewDocument {
    /// Creates a payload with a title and body.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, WorkspaceDomainError> {
        let document = Self {
            title: title.into(),
            content: content.into(),
            doc_type: default_doc_type(),
            parent_id: None,
        };
        document.validate()?;
        Ok(document)
    }

    /// Sets the document type label.
    #[must_use]
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    /// Validates a payload that arrived through deserialisation.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyTitle`] when the title is blank.
    pub fn validate(&self) -> Result<(), WorkspaceDomainError> {
        if self.title.trim().is_empty() {
            return Err(WorkspaceDomainError::EmptyTitle("document"));
        }
        Ok(())
    }
}

/// Partial update for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl DocumentPatch {
    /// Applies the patch to a document in place.
    pub fn apply_to(&self, document: &mut Document) {
        if let Some(title) = &self.title {
            document.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            document.content.clone_from(content);
        }
    }
}
