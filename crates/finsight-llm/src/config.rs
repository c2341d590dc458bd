// Configuration layer for provider-agnostic chat client creation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::traits::{ChatClient, ChatOptions, ChatRequest};
use crate::types::Message;

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    /// Base URL for the API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        let mut client = crate::openai::OpenAIClient::new(config.api_key)?;
        if let Some(base_url) = config.base_url {
            client = client.with_base_url(base_url);
        }
        Ok(Arc::new(client))
    }
}

/// Model parameters applied to every completion the advisor issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl ModelSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build a request for `messages` with these settings applied
    pub fn request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest::new(self.model.clone(), messages).with_options(
            ChatOptions::new()
                .temperature(self.temperature)
                .max_tokens(self.max_tokens),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ModelSettings::default();
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.max_tokens, 1000);
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_settings_build_request() {
        let request = ModelSettings::new("gpt-4o")
            .temperature(0.2)
            .max_tokens(50)
            .request(vec![Message::human("hi")]);

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.options.temperature, Some(0.2));
        assert_eq!(request.options.max_tokens, Some(50));
    }

    #[test]
    fn test_factory_creates_client() {
        let config = ProviderConfig::openai("test-key").with_base_url("http://localhost:9999/v1");
        assert!(ClientFactory::create_chat_client(config).is_ok());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ProviderConfig::openai("test-key");
        let json = serde_json::to_string(&config).unwrap();
        let back: ProviderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api_key, "test-key");
        assert!(back.base_url.is_none());
    }
}
