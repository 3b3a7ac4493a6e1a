//! Configuration for the assistant and its model connection.
//!
//! Both structs deserialise with defaults for every omitted field, so a
//! partial configuration file is enough. Call `validate` after loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric setting is outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Setting name.
        field: &'static str,
        /// Inclusive lower bound.
        min: u64,
        /// Inclusive upper bound.
        max: u64,
        /// Rejected value.
        value: u64,
    },

    /// The provider name is not recognised.
    #[error("unknown model provider: {0}")]
    UnknownProvider(String),

    /// A required setting is absent.
    #[error("missing setting: {0}")]
    Missing(&'static str),

    /// A setting could not be parsed.
    #[error("invalid value for {field}: {value}")]
    Invalid {
        /// Setting name.
        field: &'static str,
        /// Rejected raw value.
        value: String,
    },
}

/// Upper bound on tool-loop steps per turn.
pub const MAX_STEPS_LIMIT: usize = 10;

/// Limits applied to every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model invocations allowed per tool-calling turn.
    pub max_steps: usize,
    /// History messages shown to the intent classifier.
    pub classifier_history_window: usize,
    /// History messages included in workflow prompts.
    pub context_history_window: usize,
    /// Timeout applied to each external call, in seconds.
    pub call_timeout_secs: u64,
    /// Created entities remembered for prompts.
    pub created_entity_limit: usize,
    /// Scratchpad notes kept between turns.
    pub scratchpad_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 4,
            classifier_history_window: 5,
            context_history_window: 12,
            call_timeout_secs: 60,
            created_entity_limit: 25,
            scratchpad_limit: 20,
        }
    }
}

impl AgentConfig {
    /// Sets the step limit.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the per-call timeout, rounding any fraction up to the next
    /// whole second.
    #[must_use]
    pub const fn with_call_timeout(mut self, timeout: Duration) -> Self {
        let whole = timeout.as_secs();
        self.call_timeout_secs = if timeout.subsec_nanos() > 0 {
            whole.saturating_add(1)
        } else {
            whole
        };
        self
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Checks every limit against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first setting outside its
    /// range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_steps", to_u64(self.max_steps), 1, to_u64(MAX_STEPS_LIMIT))?;
        check_range("classifier_history_window", to_u64(self.classifier_history_window), 0, 100)?;
        check_range("context_history_window", to_u64(self.context_history_window), 0, 200)?;
        check_range("call_timeout_secs", self.call_timeout_secs, 1, 600)?;
        check_range("created_entity_limit", to_u64(self.created_entity_limit), 1, 500)?;
        check_range("scratchpad_limit", to_u64(self.scratchpad_limit), 1, 500)?;
        Ok(())
    }
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

const fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// Supported OpenAI-compatible model services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI.
    #[default]
    OpenAi,
    /// Groq.
    Groq,
    /// A local Ollama server.
    Ollama,
}

impl ProviderKind {
    /// Returns the lower-case provider name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::Ollama => "ollama",
        }
    }

    /// Returns the chat-completions base URL used when none is configured.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::Ollama => "http://localhost:11434/v1",
        }
    }

    /// Returns the model used when none is configured.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Groq => "llama-3.3-70b-versatile",
            Self::Ollama => "llama3.1",
        }
    }

    /// Returns whether the service requires an API key.
    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderKind {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::UnknownProvider(value.to_owned())),
        }
    }
}

/// Connection settings for the model service.
///
/// The API key is never serialised and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Which service to call.
    pub provider: ProviderKind,
    /// Bearer token.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name; the provider default is used when empty.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Output token cap.
    pub max_output_tokens: u32,
    /// Overrides the provider's default base URL.
    pub base_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            model: String::new(),
            temperature: 0.7,
            max_output_tokens: 2048,
            base_url: None,
        }
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ModelConfig {
    /// Reads `ATELIER_MODEL_PROVIDER`, `ATELIER_MODEL_API_KEY`,
    /// `ATELIER_MODEL_NAME`, `ATELIER_MODEL_TEMPERATURE`,
    /// `ATELIER_MODEL_MAX_OUTPUT_TOKENS` and `ATELIER_MODEL_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an unusable value or
    /// the selected provider needs a key that is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ModelConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(provider) = lookup("ATELIER_MODEL_PROVIDER") {
            config.provider = ProviderKind::try_from(provider.as_str())?;
        }
        config.api_key = lookup("ATELIER_MODEL_API_KEY").filter(|key| !key.trim().is_empty());
        if let Some(model) = lookup("ATELIER_MODEL_NAME") {
            config.model = model;
        }
        if let Some(raw) = lookup("ATELIER_MODEL_TEMPERATURE") {
            config.temperature = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "temperature",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("ATELIER_MODEL_MAX_OUTPUT_TOKENS") {
            config.max_output_tokens = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "max_output_tokens",
                value: raw.clone(),
            })?;
        }
        config.base_url = lookup("ATELIER_MODEL_BASE_URL");
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be used to build a provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the provider needs an API key
    /// and none is set, or [`ConfigError::Invalid`] for a temperature
    /// outside `[0, 2]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.requires_api_key() && self.api_key.is_none() {
            return Err(ConfigError::Missing("api_key"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid {
                field: "temperature",
                value: self.temperature.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the configured model name or the provider default.
    #[must_use]
    pub fn model_name(&self) -> &str {
        if self.model.trim().is_empty() {
            self.provider.default_model()
        } else {
            self.model.as_str()
        }
    }

    /// Returns the configured base URL or the provider default, without a
    /// trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }
}
