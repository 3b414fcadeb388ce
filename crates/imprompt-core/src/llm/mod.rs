//! LLM integration: provider abstraction, retry policy and the client wrapper.
//!
//! Every stage of the pipeline goes through [`LlmClient::call`], which owns
//! the rate-limit retry/fallback behavior and `<think>` span cleanup.

pub(crate) mod client;
#[cfg(test)]
pub(crate) mod mock;
pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod retry;
pub(crate) mod think;

pub use client::LlmClient;
pub use openai::OpenAiCompatProvider;
pub use provider::{
    create_provider, ChatMessage, ChatProvider, ChatRequest, ChatResponse, ContentPart, ImageUrl,
    MessageContent, ResponseFormat, Role,
};
pub use retry::{backoff_duration, is_rate_limited, RetryPolicy, RetryState};
pub use think::strip_think_tags;
