//! LLM backend abstraction for model-written summaries
//!
//! Supports OpenAI-compatible APIs (OpenAI, OpenRouter, local servers) and
//! Anthropic Claude.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// LLM backend errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// Generic LLM backend trait
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion with system prompt
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Thread-safe reference to an LLM backend
pub type SharedBackend = Arc<dyn LlmBackend>;

/// Which service writes model summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Template summaries only
    #[default]
    None,
    OpenAi,
    OpenRouter,
    Anthropic,
    /// OpenAI-compatible local server (Ollama, llama.cpp, vLLM)
    Local,
}

impl LlmProvider {
    fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::None => "",
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::OpenRouter => "openai/gpt-4o-mini",
            LlmProvider::Anthropic => "claude-3-5-haiku-latest",
            LlmProvider::Local => "llama3.1",
        }
    }
}

/// Summarizer model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    /// Model name; provider default when unset
    pub model: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL for local servers
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u16,
    /// Upper bound on one summary call
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::None,
            model: None,
            api_key: None,
            base_url: None,
            temperature: 0.2,
            max_tokens: 700,
            timeout_secs: 15,
        }
    }
}

impl LlmSettings {
    pub fn model(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn require_key(&self) -> Result<String, LlmError> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::Config(format!("{:?} requires an API key", self.provider)))
    }
}

/// OpenAI-compatible backend configuration
#[derive(Debug, Clone)]
pub struct OpenAIBackendConfig {
    /// API key
    pub api_key: String,
    /// Base URL (for OpenRouter, local servers, etc.)
    pub base_url: Option<String>,
    /// Model name
    pub model: String,
    /// Temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Max tokens
    pub max_tokens: u16,
}

impl OpenAIBackendConfig {
    fn from_settings(settings: &LlmSettings, api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url,
            model: settings.model(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// OpenAI-compatible LLM backend
pub struct OpenAIBackend {
    client: Client<OpenAIConfig>,
    config: OpenAIBackendConfig,
}

impl OpenAIBackend {
    pub fn new(config: OpenAIBackendConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(openai_config),
            config,
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(|e| LlmError::Api(e.to_string()))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()
                    .map_err(|e| LlmError::Api(e.to_string()))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Anthropic Claude backend configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

/// Anthropic Claude backend
pub struct AnthropicBackend {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicBackend {
    pub fn new(config: AnthropicConfig, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system,
            "messages": [
                {"role": "user", "content": user}
            ]
        });

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("Anthropic API error {}: {}", status, text)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        json["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|block| block["text"].as_str())
            .map(|s| s.to_string())
            .ok_or(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Build the configured backend; `None` when summaries are template-only
pub fn create_backend(settings: &LlmSettings) -> Result<Option<SharedBackend>, LlmError> {
    let backend: SharedBackend = match settings.provider {
        LlmProvider::None => return Ok(None),
        LlmProvider::OpenAi => Arc::new(OpenAIBackend::new(OpenAIBackendConfig::from_settings(
            settings,
            settings.require_key()?,
            None,
        ))),
        LlmProvider::OpenRouter => Arc::new(OpenAIBackend::new(OpenAIBackendConfig::from_settings(
            settings,
            settings.require_key()?,
            Some("https://openrouter.ai/api/v1".to_string()),
        ))),
        LlmProvider::Local => {
            let base_url = settings
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434/v1".to_string());
            let api_key = settings.api_key.clone().unwrap_or_else(|| "sk-local".to_string());
            Arc::new(OpenAIBackend::new(OpenAIBackendConfig::from_settings(
                settings,
                api_key,
                Some(base_url),
            )))
        }
        LlmProvider::Anthropic => Arc::new(AnthropicBackend::new(
            AnthropicConfig {
                api_key: settings.require_key()?,
                model: settings.model(),
                max_tokens: settings.max_tokens as u32,
            },
            settings.timeout(),
        )?),
    };

    Ok(Some(backend))
}
