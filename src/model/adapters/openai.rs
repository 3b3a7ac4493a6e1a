//! Adapter for OpenAI-compatible chat-completions endpoints.
//!
//! OpenAI, Groq and Ollama all speak the same wire format; only the base URL,
//! credentials and a few capabilities differ.

use crate::config::{ModelConfig, ProviderKind};
use crate::model::domain::{
    ModelCapabilities, ModelMessage, ModelRequest, ModelResponse, ResponseFormat,
    ToolCallRequest, ToolSpec,
};
use crate::model::ports::{ModelError, ModelProvider, ModelResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use tracing::debug;

/// A [`ModelProvider`] backed by an OpenAI-compatible HTTP API.
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: ModelConfig,
    capabilities: ModelCapabilities,
}

impl OpenAiCompatibleProvider {
    /// Creates a provider, resolving capabilities from the provider kind.
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        let capabilities = capabilities_for(config.provider);
        Self {
            client: Client::new(),
            config,
            capabilities,
        }
    }

    /// Overrides the resolved capabilities, for self-hosted models whose
    /// features differ from the provider default.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: ModelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    fn request_body(&self, request: &ModelRequest) -> ChatRequest {
        let tools = if self.capabilities.supports_tool_binding() {
            request.tools.iter().map(tool_to_wire).collect()
        } else {
            Vec::new()
        };
        let response_format = (request.response_format == ResponseFormat::Json
            && self.capabilities.supports_json_mode())
        .then(|| json!({ "type": "json_object" }));

        ChatRequest {
            model: self.config.model_name().to_owned(),
            messages: request.messages.iter().map(message_to_wire).collect(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_output_tokens,
            tools,
            response_format,
        }
    }
}

impl fmt::Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("config", &self.config)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

const fn capabilities_for(kind: ProviderKind) -> ModelCapabilities {
    match kind {
        ProviderKind::OpenAi | ProviderKind::Groq => ModelCapabilities::new(true, true),
        ProviderKind::Ollama => ModelCapabilities::new(false, true),
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleProvider {
    fn capabilities(&self) -> ModelCapabilities {
        self.capabilities
    }

    async fn invoke(&self, request: ModelRequest) -> ModelResult<ModelResponse> {
        let body = self.request_body(&request);
        let url = format!("{}/chat/completions", self.config.base_url());
        debug!(
            provider = %self.config.provider,
            model = %body.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "invoking model"
        );

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await.map_err(ModelError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|err| ModelError::InvalidResponse(err.to_string()))?;
        parse_completion(completion)
    }
}

fn message_to_wire(message: &ModelMessage) -> WireMessage {
    WireMessage {
        role: message.role,
        content: message.content.clone(),
    }
}

fn tool_to_wire(tool: &ToolSpec) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

fn parse_completion(completion: ChatCompletion) -> ModelResult<ModelResponse> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::InvalidResponse("response contained no choices".to_owned()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let arguments = serde_json::from_str(&call.function.arguments)
                .unwrap_or_else(|_| Value::String(call.function.arguments));
            ToolCallRequest::new(call.id, call.function.name, arguments)
        })
        .collect();

    Ok(ModelResponse::text(choice.message.content.unwrap_or_default()).with_tool_calls(tool_calls))
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: crate::model::domain::ModelRole,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ResponseFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> ModelRequest {
        ModelRequest::new(vec![ModelMessage::system("rules"), ModelMessage::user("hi")])
            .with_tools(vec![ToolSpec {
                name: "list_tasks".to_owned(),
                description: "List tasks".to_owned(),
                parameters: json!({ "type": "object", "properties": {} }),
            }])
            .json()
    }

    fn provider(kind: ProviderKind) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(ModelConfig {
            provider: kind,
            api_key: Some("sk-test".to_owned()),
            ..ModelConfig::default()
        })
    }

    #[rstest]
    fn body_binds_tools_and_json_mode_when_supported(request: ModelRequest) {
        let body = serde_json::to_value(provider(ProviderKind::OpenAi).request_body(&request))
            .expect("serialisable");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["tools"][0]["function"]["name"], "list_tasks");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[rstest]
    fn body_omits_tools_without_tool_binding(request: ModelRequest) {
        let body = serde_json::to_value(provider(ProviderKind::Ollama).request_body(&request))
            .expect("serialisable");

        assert!(body.get("tools").is_none());
    }

    #[rstest]
    fn completion_parses_tool_call_arguments() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "create_task", "arguments": "{\"title\":\"Ship\"}" }
                    }]
                }
            }]
        }))
        .expect("valid completion");

        let response = parse_completion(completion).expect("parsed");

        assert_eq!(response.content, "");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(
            response.tool_calls.first().map(|call| call.arguments.clone()),
            Some(json!({ "title": "Ship" }))
        );
    }

    #[rstest]
    fn completion_without_choices_is_invalid() {
        let completion = ChatCompletion { choices: Vec::new() };

        assert!(matches!(
            parse_completion(completion),
            Err(ModelError::InvalidResponse(_))
        ));
    }

    #[rstest]
    fn debug_output_hides_api_key() {
        let rendered = format!("{:?}", provider(ProviderKind::Groq));

        assert!(!rendered.contains("sk-test"));
    }
}
