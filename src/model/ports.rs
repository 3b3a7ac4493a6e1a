//! The model provider port.

use super::domain::{ModelCapabilities, ModelRequest, ModelResponse};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by model providers.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The request never produced an HTTP response.
    #[error("model transport failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The provider answered with an error status.
    #[error("model API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message.
        message: String,
    },

    /// The provider answered with a body that could not be understood.
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    /// Wraps a transport error.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

/// A language model endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the capabilities resolved at construction.
    fn capabilities(&self) -> ModelCapabilities;

    /// Sends one request and returns the model's reply.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the call fails or the reply is unusable.
    async fn invoke(&self, request: ModelRequest) -> ModelResult<ModelResponse>;
}
