//! Error types for workspace record validation and parsing.

use thiserror::Error;

/// Errors returned while constructing workspace values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The entity identifier is empty after trimming.
    #[error("entity identifier must not be empty")]
    EmptyId,

    /// A title is empty after trimming.
    #[error("{0} title must not be empty")]
    EmptyTitle(&'static str),
}

/// Error returned while parsing an entity kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown entity kind: {0}")]
pub struct ParseEntityKindError(pub String);
