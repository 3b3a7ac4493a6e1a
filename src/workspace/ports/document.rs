//! Document provider port.

use super::WorkspaceResult;
use crate::workspace::domain::{Document, DocumentPatch, EntityId, NewDocument};
use async_trait::async_trait;

/// Document store contract consumed by the assistant tools.
#[async_trait]
pub trait DocProvider: Send + Sync {
    /// Creates a document and returns the stored record.
    async fn create(&self, document: &NewDocument) -> WorkspaceResult<Document>;

    /// Applies a partial update to a document.
    async fn update(&self, id: &EntityId, patch: &DocumentPatch) -> WorkspaceResult<Document>;

    /// Lists all documents.
    async fn list(&self) -> WorkspaceResult<Vec<Document>>;

    /// Finds a document by identifier.
    async fn get_by_id(&self, id: &EntityId) -> WorkspaceResult<Option<Document>>;
}
