//! Errors shared by the workspace provider ports.

use crate::workspace::domain::{EntityId, EntityKind, WorkspaceDomainError};
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace provider operations.
pub type WorkspaceResult<T> = Result<T, WorkspaceProviderError>;

/// Errors returned by workspace provider implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceProviderError {
    /// The referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Identifier that was looked up.
        id: EntityId,
    },

    /// The provider refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The payload failed domain validation.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),

    /// Infrastructure failure inside the provider.
    #[error("provider unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkspaceProviderError {
    /// Creates a not-found error.
    #[must_use]
    pub const fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    /// Wraps an infrastructure error.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
