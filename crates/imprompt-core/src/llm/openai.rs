//! OpenAI-compatible chat provider (Groq by default, xAI and OpenAI work too).
//!
//! Sends the conversation to `{endpoint}/chat/completions`; images travel as
//! data URLs inside the user message content array.

use super::provider::{ChatMessage, ChatProvider, ChatRequest, ChatResponse, ResponseFormat};
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Provider for any endpoint speaking the Chat Completions protocol.
pub struct OpenAiCompatProvider {
    api_key: String,
    base_url: String,
    name: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Self {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Self {
            api_key: api_key.to_string(),
            name: provider_name_for(&base_url).to_string(),
            base_url,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List model ids available to this API key.
    pub async fn list_models(&self) -> Result<Vec<String>, PipelineError> {
        let resp = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PipelineError::Llm {
                message: format!("{} model listing failed: {e}", self.name),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Llm {
                message: format!("{} HTTP {status}: {text}", self.name),
                status_code: Some(status.as_u16()),
            });
        }

        let list: ModelList = resp.json().await.map_err(|e| PipelineError::Llm {
            message: format!("Failed to parse {} model list: {e}", self.name),
            status_code: None,
        })?;

        let mut ids: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
        ids.sort();
        Ok(ids)
    }
}

fn provider_name_for(base_url: &str) -> &'static str {
    if base_url.contains("groq.com") {
        "groq"
    } else if base_url.contains("x.ai") {
        "xai"
    } else if base_url.contains("openai.com") {
        "openai"
    } else {
        "openai-compatible"
    }
}

// --- Request types ---

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a ResponseFormat>,
}

impl<'a> From<&'a ChatRequest> for CompletionBody<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            response_format: request.response_format.as_ref(),
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

fn parse_completion(
    provider: &str,
    body: &str,
    latency_ms: u64,
) -> Result<ChatResponse, PipelineError> {
    let resp: CompletionResponse =
        serde_json::from_str(body).map_err(|e| PipelineError::Llm {
            message: format!("Failed to parse {provider} response: {e}"),
            status_code: None,
        })?;

    let text = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| PipelineError::Llm {
            message: format!("{provider} returned empty choices array, no content generated"),
            status_code: None,
        })?;

    Ok(ChatResponse {
        text,
        model: resp.model,
        tokens_used: resp.usage.map(|u| u.total_tokens),
        latency_ms,
    })
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PipelineError> {
        let start = Instant::now();

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CompletionBody::from(request))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PipelineError::Llm {
                message: format!("{} request failed: {e}", self.name),
                status_code: None,
            })?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(PipelineError::Llm {
                message: format!("{} HTTP {status}: {text}", self.name),
                status_code: Some(status.as_u16()),
            });
        }

        parse_completion(&self.name, &text, start.elapsed().as_millis() as u64)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(response_format: Option<ResponseFormat>) -> ChatRequest {
        ChatRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
            temperature: 0.1,
            response_format,
        }
    }

    #[test]
    fn test_body_omits_absent_response_format() {
        let req = request(None);
        let value = serde_json::to_value(CompletionBody::from(&req)).unwrap();
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["messages"][1], json!({"role": "user", "content": "hello"}));
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_body_includes_response_format_hint() {
        let req = request(Some(ResponseFormat::json_object()));
        let value = serde_json::to_value(CompletionBody::from(&req)).unwrap();
        assert_eq!(value["response_format"], json!({"type": "json_object"}));
    }

    #[test]
    fn test_parse_completion_success() {
        let body = json!({
            "model": "llama-3.3-70b-versatile",
            "choices": [{"message": {"role": "assistant", "content": "  A red bicycle.  "}}],
            "usage": {"total_tokens": 57}
        })
        .to_string();
        let resp = parse_completion("groq", &body, 12).unwrap();
        // Raw text is returned; trimming happens in the client
        assert_eq!(resp.text, "  A red bicycle.  ");
        assert_eq!(resp.tokens_used, Some(57));
        assert_eq!(resp.latency_ms, 12);
    }

    #[test]
    fn test_parse_completion_empty_choices() {
        let body = json!({"model": "m", "choices": []}).to_string();
        let err = parse_completion("groq", &body, 0).unwrap_err();
        assert!(err.to_string().contains("empty choices"));
    }

    #[test]
    fn test_parse_completion_malformed_json() {
        let err = parse_completion("groq", "<html>bad gateway</html>", 0).unwrap_err();
        assert!(matches!(err, PipelineError::Llm { status_code: None, .. }));
    }

    #[test]
    fn test_provider_name_from_endpoint() {
        let p = OpenAiCompatProvider::new(
            "https://api.groq.com/openai/v1/",
            "k",
            Duration::from_secs(1),
        );
        assert_eq!(p.name(), "groq");
        assert_eq!(p.base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(provider_name_for("https://api.x.ai/v1"), "xai");
        assert_eq!(provider_name_for("http://localhost:8080/v1"), "openai-compatible");
    }
}
