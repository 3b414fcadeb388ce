//! Scripted provider for unit tests.

use super::provider::{ChatProvider, ChatRequest, ChatResponse};
use crate::error::PipelineError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ResponseFn = dyn Fn(&ChatRequest, u32) -> Result<String, PipelineError> + Send + Sync;

/// A provider whose replies come from a closure of (request, call index).
///
/// Every request is recorded so tests can assert on models, temperatures and
/// message contents after the fact.
pub(crate) struct MockProvider {
    response_fn: Box<ResponseFn>,
    call_count: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&ChatRequest, u32) -> Result<String, PipelineError> + Send + Sync + 'static,
    {
        Self {
            response_fn: Box::new(f),
            call_count: Arc::new(AtomicU32::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn success(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Ok(text.clone()))
    }

    /// Fail with `error_fn` for the first `failures` calls, then return `text`.
    pub(crate) fn fail_then_succeed(
        failures: u32,
        error_fn: fn() -> PipelineError,
        text: &str,
    ) -> Self {
        let text = text.to_string();
        Self::new(move |_, idx| {
            if idx < failures {
                Err(error_fn())
            } else {
                Ok(text.clone())
            }
        })
    }

    pub(crate) fn call_count_handle(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    pub(crate) fn requests_handle(&self) -> Arc<Mutex<Vec<ChatRequest>>> {
        self.requests.clone()
    }
}

pub(crate) fn rate_limit_error() -> PipelineError {
    PipelineError::Llm {
        message: "groq HTTP 429 Too Many Requests: rate_limit_exceeded".to_string(),
        status_code: Some(429),
    }
}

pub(crate) fn auth_error() -> PipelineError {
    PipelineError::Llm {
        message: "groq HTTP 401 Unauthorized: invalid_api_key".to_string(),
        status_code: Some(401),
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PipelineError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let text = (self.response_fn)(request, idx)?;
        Ok(ChatResponse {
            text,
            model: request.model.clone(),
            tokens_used: Some(42),
            latency_ms: 10,
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
