//! The API client wrapper: one chat call with rate-limit retry and fallback.

use super::provider::{
    create_provider, ChatMessage, ChatProvider, ChatRequest, ChatResponse, ResponseFormat,
};
use super::retry::{RetryPolicy, RetryState};
use super::think::strip_think_tags;
use crate::config::Config;
use crate::error::{ConfigError, PipelineError, PipelineResult};
use std::sync::Arc;

/// Issues chat calls through a provider, applying the retry policy.
///
/// Stateless between calls; cheap to share behind an `Arc`.
pub struct LlmClient {
    provider: Arc<dyn ChatProvider>,
    policy: RetryPolicy,
    primary_model: String,
    fallback_model: String,
}

impl LlmClient {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        policy: RetryPolicy,
        primary_model: &str,
        fallback_model: &str,
    ) -> Self {
        Self {
            provider,
            policy,
            primary_model: primary_model.to_string(),
            fallback_model: fallback_model.to_string(),
        }
    }

    /// Build a client for the configured endpoint.
    ///
    /// Fails with `MissingApiKey` before any network activity when no key
    /// resolves.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        let provider = create_provider(&config.llm, &api_key);
        tracing::debug!(
            "Using {} at {} (primary {}, fallback {})",
            provider.name(),
            provider.base_url(),
            config.llm.primary_model,
            config.llm.fallback_model
        );
        Ok(Self::new(
            Arc::new(provider),
            RetryPolicy::from_config(&config.retry),
            &config.llm.primary_model,
            &config.llm.fallback_model,
        ))
    }

    pub fn primary_model(&self) -> &str {
        &self.primary_model
    }

    pub fn fallback_model(&self) -> &str {
        &self.fallback_model
    }

    /// Run one chat completion and return its cleaned text.
    ///
    /// Rate-limit errors are retried with doubling backoff; when the primary
    /// model runs out of attempts, the same request goes once to the fallback
    /// model. Any other error is returned as-is on first occurrence.
    pub async fn call(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
        response_format: Option<ResponseFormat>,
    ) -> PipelineResult<String> {
        let mut request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
            response_format,
        };
        let mut state = self.policy.start();

        loop {
            let outcome = self.send(&request).await;
            let can_fallback = state != RetryState::Fallback
                && request.model == self.primary_model
                && self.fallback_model != self.primary_model;
            state = self.policy.advance(state, &outcome, can_fallback);

            match state {
                RetryState::Attempt(n) => {
                    let delay = self.policy.delay_before(n);
                    tracing::warn!(
                        "Rate limited on {}, retry {}/{} after {delay:?}",
                        request.model,
                        n - 1,
                        self.policy.max_attempts - 1
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryState::Fallback => {
                    tracing::warn!(
                        "{} exhausted {} attempts, falling back to {}",
                        request.model,
                        self.policy.max_attempts,
                        self.fallback_model
                    );
                    request.model = self.fallback_model.clone();
                }
                RetryState::Succeeded | RetryState::Failed => {
                    return outcome.map(|resp| {
                        tracing::debug!(
                            "{} answered in {}ms ({:?} tokens)",
                            resp.model,
                            resp.latency_ms,
                            resp.tokens_used
                        );
                        strip_think_tags(&resp.text)
                    });
                }
            }
        }
    }

    async fn send(&self, request: &ChatRequest) -> PipelineResult<ChatResponse> {
        let timeout = self.provider.timeout();
        match tokio::time::timeout(timeout, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(PipelineError::Timeout {
                model: request.model.clone(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}
