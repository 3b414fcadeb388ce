//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// LLM provider settings (OpenAI-compatible chat completions endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,

    /// Vision-capable model used for the first stage
    pub vision_model: String,

    /// Text model for the enhancement and sanitization stages
    pub primary_model: String,

    /// Substituted for the primary model once its rate-limit retries run out
    pub fallback_model: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: "${GROQ_API_KEY}".to_string(),
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            vision_model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            primary_model: "llama-3.3-70b-versatile".to_string(),
            fallback_model: "qwen/qwen3-32b".to_string(),
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Name of the environment variable referenced by `api_key`, if any.
    pub fn api_key_env_var(&self) -> Option<&str> {
        self.api_key
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
    }
}

/// Rate-limit retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per model before giving up (or falling back)
    pub max_attempts: u32,

    /// First backoff delay in milliseconds; doubles after each failure
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2000,
        }
    }
}

/// Sampling settings for each stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Vision description temperature
    pub vision_temperature: f32,

    /// Detail enhancement temperature
    pub enhance_temperature: f32,

    /// IP sanitization temperature
    pub sanitize_temperature: f32,

    /// Re-prompt the sanitizer once if its output is shorter than its input
    pub enforce_length_floor: bool,

    /// Vision temperature for the single-pass quick generator
    pub quick_vision_temperature: f32,

    /// Copyright guardian temperature for the quick generator
    pub guardian_temperature: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            vision_temperature: 0.2,
            enhance_temperature: 0.1,
            sanitize_temperature: 0.2,
            enforce_length_floor: false,
            quick_vision_temperature: 0.05,
            guardian_temperature: 0.1,
        }
    }
}

impl StageConfig {
    /// All temperatures with their config key, for validation.
    pub(crate) fn temperatures(&self) -> [(&'static str, f32); 5] {
        [
            ("stages.vision_temperature", self.vision_temperature),
            ("stages.enhance_temperature", self.enhance_temperature),
            ("stages.sanitize_temperature", self.sanitize_temperature),
            ("stages.quick_vision_temperature", self.quick_vision_temperature),
            ("stages.guardian_temperature", self.guardian_temperature),
        ]
    }
}

/// Limits on the input image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum image file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 20,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
