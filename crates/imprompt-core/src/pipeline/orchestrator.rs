//! Sequential pipeline: VISION → ENHANCE → SANITIZE → DONE.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::image::ImagePayload;
use super::prompts::IDENTITY_MANDATE;
use crate::config::{Config, StageConfig};
use crate::error::{ConfigError, PipelineResult};
use crate::llm::LlmClient;

/// Identifies which transition a progress message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageId {
    Vision,
    Enhance,
    Sanitize,
    Done,
}

impl StageId {
    pub fn as_str(self) -> &'static str {
        match self {
            StageId::Vision => "vision",
            StageId::Enhance => "enhance",
            StageId::Sanitize => "sanitize",
            StageId::Done => "done",
        }
    }

    /// Message reported when this stage starts (or, for `Done`, on completion).
    pub fn status_message(self) -> &'static str {
        match self {
            StageId::Vision => "Stage 1/3: analyzing the image...",
            StageId::Enhance => "Stage 2/3: expanding texture and lighting detail...",
            StageId::Sanitize => "Stage 3/3: scrubbing copyrighted references...",
            StageId::Done => "Pipeline complete. Prompt ready.",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous progress hook: `(message, stage)`.
pub type ProgressCallback = dyn Fn(&str, StageId) + Send + Sync;

/// Every intermediate output of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTrace {
    pub vision: String,
    pub enhanced: String,
    pub sanitized: String,
    /// `sanitized` followed by the identity mandate
    pub prompt: String,
}

/// Runs the three stages in order for one image.
pub struct PromptPipeline {
    pub(crate) client: Arc<LlmClient>,
    pub(crate) vision_model: String,
    pub(crate) stages: StageConfig,
    max_file_size_mb: u64,
}

impl PromptPipeline {
    pub fn new(client: Arc<LlmClient>, config: &Config) -> Self {
        Self {
            client,
            vision_model: config.llm.vision_model.clone(),
            stages: config.stages.clone(),
            max_file_size_mb: config.limits.max_file_size_mb,
        }
    }

    /// Build the client and pipeline from config; fails fast without an API key.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client = LlmClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Turn the image at `image_path` into the final prompt text.
    pub async fn run(
        &self,
        image_path: &Path,
        progress: Option<&ProgressCallback>,
    ) -> PipelineResult<String> {
        self.run_with_trace(image_path, progress)
            .await
            .map(|trace| trace.prompt)
    }

    /// Like [`run`](Self::run) but keeps every stage's output.
    ///
    /// Errors from any stage are returned unchanged; later stages never run.
    pub async fn run_with_trace(
        &self,
        image_path: &Path,
        progress: Option<&ProgressCallback>,
    ) -> PipelineResult<PipelineTrace> {
        let report = |stage: StageId| {
            tracing::debug!("Entering {stage} stage");
            if let Some(cb) = progress {
                cb(stage.status_message(), stage);
            }
        };

        report(StageId::Vision);
        let image = ImagePayload::load(image_path, self.max_file_size_mb).await?;
        let vision = self.describe(&image).await?;
        drop(image);

        report(StageId::Enhance);
        let enhanced = self.enhance(&vision).await?;

        report(StageId::Sanitize);
        let sanitized = self.sanitize(&enhanced).await?;

        report(StageId::Done);
        tracing::info!(
            "Prompt ready: {} → {} → {} chars",
            vision.chars().count(),
            enhanced.chars().count(),
            sanitized.chars().count()
        );

        let prompt = format!("{sanitized}{IDENTITY_MANDATE}");
        Ok(PipelineTrace {
            vision,
            enhanced,
            sanitized,
            prompt,
        })
    }
}
