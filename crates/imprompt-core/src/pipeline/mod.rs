//! The image-to-prompt pipeline.
//!
//! ```text
//! Image → Vision → Enhance → Sanitize → + identity mandate
//! ```

pub mod image;
pub mod orchestrator;
pub mod prompts;
pub mod quick;
mod stages;

pub use image::ImagePayload;
pub use orchestrator::{PipelineTrace, ProgressCallback, PromptPipeline, StageId};
pub use prompts::IDENTITY_MANDATE;
pub use quick::{PromptMode, QuickGenerator};
