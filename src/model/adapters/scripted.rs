//! A model provider that replays scripted replies.
//!
//! Used by tests and demos to drive the assistant without a network. Every
//! request is recorded so callers can assert on what the assistant sent.

use crate::model::domain::{ModelCapabilities, ModelRequest, ModelResponse};
use crate::model::ports::{ModelError, ModelProvider, ModelResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<ModelResult<ModelResponse>>,
    repeat: Option<ModelResponse>,
    requests: Vec<ModelRequest>,
}

/// Replays queued replies in order, then an optional repeating reply.
///
/// Clones share the same script, so a test can keep a handle after passing
/// the provider to the assistant.
#[derive(Debug, Clone)]
pub struct ScriptedModelProvider {
    capabilities: ModelCapabilities,
    delay: Option<Duration>,
    script: Arc<Mutex<Script>>,
}

impl Default for ScriptedModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedModelProvider {
    /// Creates an empty script with tool binding and JSON mode enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: ModelCapabilities::new(true, true),
            delay: None,
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// Overrides the advertised capabilities.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: ModelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Waits this long before answering each request.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a reply.
    #[must_use]
    pub fn then_respond(self, response: ModelResponse) -> Self {
        self.lock().queue.push_back(Ok(response));
        self
    }

    /// Queues a text-only reply.
    #[must_use]
    pub fn then_text(self, content: impl Into<String>) -> Self {
        self.then_respond(ModelResponse::text(content))
    }

    /// Queues a failure.
    #[must_use]
    pub fn then_fail(self, error: ModelError) -> Self {
        self.lock().queue.push_back(Err(error));
        self
    }

    /// Returns `response` for every request once the queue is drained.
    #[must_use]
    pub fn repeating(self, response: ModelResponse) -> Self {
        self.lock().repeat = Some(response);
        self
    }

    /// Returns how many requests have been received.
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Returns a copy of every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // Every mutation is a single push or pop, so a poisoned script is intact.
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ModelProvider for ScriptedModelProvider {
    fn capabilities(&self) -> ModelCapabilities {
        self.capabilities
    }

    async fn invoke(&self, request: ModelRequest) -> ModelResult<ModelResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut script = self.lock();
        script.requests.push(request);
        script.queue.pop_front().unwrap_or_else(|| {
            script
                .repeat
                .clone()
                .ok_or_else(|| ModelError::InvalidResponse("script exhausted".to_owned()))
        })
    }
}
