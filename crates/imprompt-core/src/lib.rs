//! imprompt core - turn an image into an IP-scrubbed generation prompt.
//!
//! Three chat-completion stages run strictly in sequence: a vision model
//! describes the image, a text model amplifies the detail, and a final pass
//! replaces character and brand names with neutral visual descriptions. Rate
//! limits are absorbed by the client's retry/fallback policy.
//!
//! # Usage
//!
//! ```rust,ignore
//! use imprompt_core::{Config, PromptPipeline};
//!
//! #[tokio::main]
//! async fn main() -> imprompt_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = PromptPipeline::from_config(&config)?;
//!
//!     let prompt = pipeline
//!         .run("./image.jpg".as_ref(), Some(&|msg: &str, _| eprintln!("{msg}")))
//!         .await?;
//!     println!("{prompt}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;

pub use config::Config;
pub use error::{ConfigError, ImpromptError, PipelineError, PipelineResult, Result};
pub use llm::{LlmClient, OpenAiCompatProvider, RetryPolicy};
pub use pipeline::{
    PipelineTrace, PromptMode, PromptPipeline, QuickGenerator, StageId, IDENTITY_MANDATE,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
