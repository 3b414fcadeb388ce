//! Single-pass generator: one vision call in a chosen style, then a
//! best-effort copyright guardian pass.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::image::ImagePayload;
use super::prompts;
use crate::config::Config;
use crate::error::{ConfigError, PipelineResult};
use crate::llm::{ChatMessage, LlmClient};

/// Writing style for the quick generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    /// Layered paragraphs on costume, materials and environment
    #[default]
    Narrative,
    /// One dense technical block on materials and body mechanics
    Forensic,
    /// Mood-first cinematic description (no copyright rules in the template)
    Artistic,
}

impl PromptMode {
    pub const ALL: [PromptMode; 3] = [PromptMode::Narrative, PromptMode::Forensic, PromptMode::Artistic];

    pub fn system_prompt(self) -> &'static str {
        match self {
            PromptMode::Narrative => prompts::NARRATIVE_PROMPT,
            PromptMode::Forensic => prompts::FORENSIC_PROMPT,
            PromptMode::Artistic => prompts::ARTISTIC_PROMPT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromptMode::Narrative => "narrative",
            PromptMode::Forensic => "forensic",
            PromptMode::Artistic => "artistic",
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptMode {
    type Err = String;

    /// Unknown names fall back to the default mode rather than failing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = PromptMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_else(|| {
                tracing::warn!("Unknown prompt mode '{s}', using {}", PromptMode::default());
                PromptMode::default()
            });
        Ok(mode)
    }
}

/// Vision call plus guardian pass, with the fidelity header on top.
pub struct QuickGenerator {
    client: Arc<LlmClient>,
    vision_model: String,
    vision_temperature: f32,
    guardian_temperature: f32,
    max_file_size_mb: u64,
}

impl QuickGenerator {
    pub fn new(client: Arc<LlmClient>, config: &Config) -> Self {
        Self {
            client,
            vision_model: config.llm.vision_model.clone(),
            vision_temperature: config.stages.quick_vision_temperature,
            guardian_temperature: config.stages.guardian_temperature,
            max_file_size_mb: config.limits.max_file_size_mb,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client = LlmClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub async fn generate(&self, image_path: &Path, mode: PromptMode) -> PipelineResult<String> {
        let image = ImagePayload::load(image_path, self.max_file_size_mb).await?;
        let raw = self
            .client
            .call(
                &self.vision_model,
                vec![
                    ChatMessage::system(mode.system_prompt()),
                    ChatMessage::user_image(image.data_url()),
                ],
                self.vision_temperature,
                None,
            )
            .await?;

        let sanitized = self.guard(&raw).await;
        Ok(format!("{}{sanitized}", prompts::FIDELITY_LOCK))
    }

    /// Copyright guardian pass. Falls back to the unsanitized text on failure.
    async fn guard(&self, text: &str) -> String {
        let result = self
            .client
            .call(
                self.client.primary_model(),
                vec![
                    ChatMessage::system(prompts::GUARDIAN_PROMPT),
                    ChatMessage::user(prompts::guardian_user_message(text)),
                ],
                self.guardian_temperature,
                None,
            )
            .await;

        match result {
            Ok(sanitized) => sanitized,
            Err(e) => {
                tracing::warn!("Copyright guardian failed, returning unguarded text: {e}");
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::llm::mock::{auth_error, MockProvider};
    use crate::llm::{ChatRequest, RetryPolicy};
    use std::io::Write;

    fn generator(provider: MockProvider) -> QuickGenerator {
        let config = Config::default();
        let client = LlmClient::new(
            Arc::new(provider),
            RetryPolicy::default(),
            &config.llm.primary_model,
            &config.llm.fallback_model,
        );
        QuickGenerator::new(Arc::new(client), &config)
    }

    fn png_fixture() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
            .unwrap();
        file
    }

    fn is_guardian(req: &ChatRequest) -> bool {
        req.messages[0] == ChatMessage::system(prompts::GUARDIAN_PROMPT)
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("forensic".parse::<PromptMode>().unwrap(), PromptMode::Forensic);
        assert_eq!(" Artistic ".parse::<PromptMode>().unwrap(), PromptMode::Artistic);
        assert_eq!("unknown".parse::<PromptMode>().unwrap(), PromptMode::Narrative);
    }

    #[tokio::test]
    async fn test_generate_uses_mode_and_guardian() {
        let provider = MockProvider::new(|req, _| {
            if is_guardian(req) {
                Ok("clean text".to_string())
            } else {
                Ok("raw text".to_string())
            }
        });
        let requests = provider.requests_handle();
        let image = png_fixture();

        let out = generator(provider)
            .generate(image.path(), PromptMode::Forensic)
            .await
            .unwrap();

        assert_eq!(out, format!("{}clean text", prompts::FIDELITY_LOCK));
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].messages[0], ChatMessage::system(prompts::FORENSIC_PROMPT));
        assert_eq!(requests[0].temperature, 0.05);
        assert_eq!(requests[1].temperature, 0.1);
    }

    #[tokio::test]
    async fn test_guardian_failure_keeps_raw_text() {
        let provider = MockProvider::new(|req, _| {
            if is_guardian(req) {
                Err(auth_error())
            } else {
                Ok("raw text".to_string())
            }
        });
        let image = png_fixture();

        let out = generator(provider)
            .generate(image.path(), PromptMode::Narrative)
            .await
            .unwrap();

        assert_eq!(out, format!("{}raw text", prompts::FIDELITY_LOCK));
    }

    #[tokio::test]
    async fn test_vision_failure_propagates() {
        let provider = MockProvider::new(|_, _| Err(auth_error()));
        let image = png_fixture();
        let err = generator(provider)
            .generate(image.path(), PromptMode::Artistic)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Llm { .. }));
    }
}
