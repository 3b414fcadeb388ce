//! The three LLM stages: vision, enhancement and sanitization.
//!
//! Each stage is one wrapped chat call whose only inputs are its static
//! instruction and the previous stage's output (or the image, for vision).

use super::image::ImagePayload;
use super::orchestrator::PromptPipeline;
use super::prompts;
use crate::error::PipelineResult;
use crate::llm::ChatMessage;

impl PromptPipeline {
    /// Stage 1: one dense paragraph of observable visual content.
    pub async fn describe(&self, image: &ImagePayload) -> PipelineResult<String> {
        self.client
            .call(
                &self.vision_model,
                vec![
                    ChatMessage::system(prompts::VISION_PROMPT),
                    ChatMessage::user_image(image.data_url()),
                ],
                self.stages.vision_temperature,
                None,
            )
            .await
    }

    /// Stage 2: the vision paragraph with far more texture and lighting detail.
    pub async fn enhance(&self, vision: &str) -> PipelineResult<String> {
        self.client
            .call(
                self.client.primary_model(),
                vec![
                    ChatMessage::system(prompts::ENHANCE_PROMPT),
                    ChatMessage::user(prompts::enhance_user_message(vision)),
                ],
                self.stages.enhance_temperature,
                None,
            )
            .await
    }

    /// Stage 3: IP references replaced by neutral visual descriptions.
    ///
    /// With `enforce_length_floor`, a result shorter than its input triggers
    /// exactly one re-prompt; the second answer is kept regardless.
    pub async fn sanitize(&self, enhanced: &str) -> PipelineResult<String> {
        let mut messages = vec![
            ChatMessage::system(prompts::SANITIZE_PROMPT),
            ChatMessage::user(prompts::sanitize_user_message(enhanced)),
        ];
        let first = self
            .client
            .call(
                self.client.primary_model(),
                messages.clone(),
                self.stages.sanitize_temperature,
                None,
            )
            .await?;

        let input_len = enhanced.chars().count();
        if !self.stages.enforce_length_floor || first.chars().count() >= input_len {
            return Ok(first);
        }

        tracing::info!(
            "Sanitized text shrank ({} < {input_len} chars), re-prompting once",
            first.chars().count()
        );
        messages.push(ChatMessage::user(format!(
            "{}\n\nPrevious answer:\n{first}",
            prompts::LENGTH_FLOOR_REMINDER
        )));
        let second = self
            .client
            .call(
                self.client.primary_model(),
                messages,
                self.stages.sanitize_temperature,
                None,
            )
            .await?;

        if second.chars().count() < input_len {
            tracing::warn!(
                "Sanitized text still shorter than its input ({} < {input_len} chars)",
                second.chars().count()
            );
        }
        Ok(second)
    }
}
