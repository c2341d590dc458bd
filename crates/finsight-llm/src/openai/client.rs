// OpenAI-specific client implementation

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::{Content, ContentPart, Message};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at an OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build chat completion request payload
    fn build_chat_request(&self, model: &str, messages: Vec<Message>, options: &ChatOptions) -> Value {
        let openai_messages: Vec<Value> = messages.into_iter().map(convert_message).collect();

        let mut obj = Map::new();
        obj.insert("model".to_string(), Value::from(model));
        obj.insert("messages".to_string(), Value::Array(openai_messages));

        // o1 and gpt-5 models use different parameter names
        let is_reasoning_model = model.starts_with("o1") || model.starts_with("gpt-5");

        if let Some(temp) = options.temperature {
            if !is_reasoning_model {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
        }
        if let Some(max_tokens) = options.max_tokens {
            let token_field = if is_reasoning_model {
                "max_completion_tokens"
            } else {
                "max_tokens"
            };
            obj.insert(token_field.to_string(), serde_json::json!(max_tokens));
        }

        Value::Object(obj)
    }
}

/// Convert our Message type to OpenAI format
fn convert_message(message: Message) -> Value {
    let role = message.role().to_string();
    let (content, name) = match message {
        Message::System { content, name }
        | Message::Human { content, name }
        | Message::AI { content, name } => (content, name),
    };

    let mut obj = Map::new();
    obj.insert("role".to_string(), Value::String(role));
    obj.insert("content".to_string(), convert_content(content));
    if let Some(name) = name {
        obj.insert("name".to_string(), Value::String(name));
    }
    Value::Object(obj)
}

/// Convert Content to OpenAI format (string or array)
fn convert_content(content: Content) -> Value {
    match content {
        Content::Text(s) => Value::String(s),
        Content::Parts(parts) => Value::Array(
            parts
                .into_iter()
                .map(|ContentPart::Text { text }| {
                    serde_json::json!({
                        "type": "text",
                        "text": text,
                    })
                })
                .collect(),
        ),
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request.model, request.messages, &request.options);

        tracing::debug!(model = %request.model, "Sending chat completion request");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        let raw: OpenAIChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        // Convert to provider-agnostic response
        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            usage: raw.usage.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

// ============================================================================
// OPENAI-SPECIFIC RESPONSE TYPES (for Chat Completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIChatResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_uses_max_tokens_for_chat_models() {
        let client = OpenAIClient::new("test-key").unwrap();
        let options = ChatOptions::new().temperature(0.7).max_tokens(1000);
        let payload = client.build_chat_request(
            "gpt-4o-mini",
            vec![Message::system("be brief"), Message::human("hi")],
            &options,
        );

        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["max_tokens"], 1000);
        assert!(payload.get("temperature").is_some());
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_payload_for_reasoning_models() {
        let client = OpenAIClient::new("test-key").unwrap();
        let options = ChatOptions::new().temperature(0.7).max_tokens(500);
        let payload = client.build_chat_request("o1-mini", vec![Message::human("hi")], &options);

        assert!(payload.get("temperature").is_none());
        assert_eq!(payload["max_completion_tokens"], 500);
    }

    #[test]
    fn test_response_parsing_without_usage() {
        let raw = serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello"},
                "finish_reason": "stop"
            }]
        });

        let parsed: OpenAIChatResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hello"));
        assert!(parsed.usage.is_none());
    }
}
