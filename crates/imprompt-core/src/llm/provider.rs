//! Chat provider trait and request/response types.
//!
//! Defines the interface that the chat-completions backend implements, plus
//! the factory that builds it from config.

use crate::config::LlmConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One part of a multi-part user message. Only images travel as parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    ImageUrl { image_url: ImageUrl },
}

/// Image reference inside a content part (a `data:` URI for uploads).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Message body: plain text, or a list of parts when an image is attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message carrying only an image, given as a data URL.
    pub fn user_image(data_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: data_url.into(),
                },
            }]),
        }
    }
}

/// Structured-output hint, sent as `response_format: {"type": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Ordered conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Optional structured-output hint
    pub response_format: Option<ResponseFormat>,
}

/// The response from a chat-completion call.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated text, untouched
    pub text: String,
    /// Model identifier reported by the provider
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that chat backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the client holds an `Arc<dyn ChatProvider>`).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging (e.g., "groq").
    fn name(&self) -> &str;

    /// Issue one chat-completion request. No retries happen here.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PipelineError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Build the configured provider from an already-resolved API key.
pub fn create_provider(config: &LlmConfig, api_key: &str) -> super::openai::OpenAiCompatProvider {
    super::openai::OpenAiCompatProvider::new(
        &config.endpoint,
        api_key,
        Duration::from_millis(config.timeout_ms),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_message_serializes_flat() {
        let msg = ChatMessage::system("be literal");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"role": "system", "content": "be literal"}));
    }

    #[test]
    fn test_image_message_serializes_as_parts() {
        let msg = ChatMessage::user_image("data:image/png;base64,AAAA");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
                ]
            })
        );
    }

    #[test]
    fn test_response_format_json_object() {
        let value = serde_json::to_value(ResponseFormat::json_object()).unwrap();
        assert_eq!(value, json!({"type": "json_object"}));
    }

    #[test]
    fn test_create_provider_uses_config_endpoint() {
        let mut config = LlmConfig::default();
        config.endpoint = "https://api.x.ai/v1/".to_string();
        let provider = create_provider(&config, "key");
        assert_eq!(provider.base_url(), "https://api.x.ai/v1");
        assert_eq!(provider.timeout(), Duration::from_millis(config.timeout_ms));
    }
}
