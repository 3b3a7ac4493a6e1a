//! In-memory document provider.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::{allocate_id, lock_error};
use crate::workspace::{
    domain::{Document, DocumentPatch, EntityId, EntityKind, NewDocument},
    ports::{DocProvider, WorkspaceProviderError, WorkspaceResult},
};

/// Thread-safe in-memory document store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocProvider {
    state: Arc<RwLock<InMemoryDocState>>,
}

#[derive(Debug, Default)]
struct InMemoryDocState {
    next_id: u64,
    documents: Vec<Document>,
}

impl InMemoryDocProvider {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocProvider for InMemoryDocProvider {
    async fn create(&self, document: &NewDocument) -> WorkspaceResult<Document> {
        document.validate()?;
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let id = allocate_id("doc", &mut state.next_id)?;
        let stored = Document {
            id,
            title: document.title.trim().to_owned(),
            content: document.content.clone(),
            doc_type: document.doc_type.clone(),
            parent_id: document.parent_id.clone(),
        };
        state.documents.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &EntityId, patch: &DocumentPatch) -> WorkspaceResult<Document> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let document = state
            .documents
            .iter_mut()
            .find(|document| &document.id == id)
            .ok_or_else(|| WorkspaceProviderError::not_found(EntityKind::Document, id.clone()))?;
        patch.apply_to(document);
        Ok(document.clone())
    }

    async fn list(&self) -> WorkspaceResult<Vec<Document>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.documents.clone())
    }

    async fn get_by_id(&self, id: &EntityId) -> WorkspaceResult<Option<Document>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state
            .documents
            .iter()
            .find(|document| &document.id == id)
            .cloned())
    }
}
