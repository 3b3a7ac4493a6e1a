//! Provider-neutral request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Describes what a model provider supports.
///
/// Resolved when the provider is constructed; callers never query it per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    supports_tool_binding: bool,
    supports_json_mode: bool,
}

impl ModelCapabilities {
    /// Creates capabilities from the two flags.
    #[must_use]
    pub const fn new(supports_tool_binding: bool, supports_json_mode: bool) -> Self {
        Self {
            supports_tool_binding,
            supports_json_mode,
        }
    }

    /// Returns whether tool specifications can be bound to a request.
    #[must_use]
    pub const fn supports_tool_binding(&self) -> bool {
        self.supports_tool_binding
    }

    /// Returns whether the provider can be asked for a JSON-only reply.
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.supports_json_mode
    }
}

/// Role of a message sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    /// Instructions framing the conversation.
    System,
    /// Input from the user, including synthetic observation turns.
    User,
    /// Earlier model output.
    Assistant,
}

/// One message in a model transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMessage {
    /// Message role.
    pub role: ModelRole,
    /// Message text.
    pub content: String,
}

impl ModelMessage {
    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ModelRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ModelRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ModelRole::Assistant,
            content: content.into(),
        }
    }
}

/// A function the model may ask to call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Function name.
    pub name: String,
    /// What the function does.
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call identifier.
    pub id: String,
    /// Requested function name.
    pub name: String,
    /// Arguments as sent by the model.
    pub arguments: Value,
}

impl ToolCallRequest {
    /// Creates a tool call request.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Output format requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

/// A single model invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Transcript, oldest first.
    pub messages: Vec<ModelMessage>,
    /// Functions bound to this call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,
    /// Requested output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ModelRequest {
    /// Creates a free-text request with no tools.
    #[must_use]
    pub const fn new(messages: Vec<ModelMessage>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            response_format: ResponseFormat::Text,
        }
    }

    /// Binds tool specifications.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    /// Requests a JSON-only reply.
    #[must_use]
    pub const fn json(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }
}

/// The model's reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Text content, possibly empty when only tool calls were returned.
    pub content: String,
    /// Requested tool calls in the order the model listed them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelResponse {
    /// Creates a text-only response.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Attaches tool call requests.
    #[must_use]
    pub fn with_tool_calls(mut self, calls: Vec<ToolCallRequest>) -> Self {
        self.tool_calls = calls;
        self
    }

    /// Returns `true` when the model asked for at least one tool call.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
