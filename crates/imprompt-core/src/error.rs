//! Error types for the imprompt pipeline.
//!
//! Errors are split between configuration problems (caught before any
//! network call) and pipeline failures (image loading and LLM calls), each
//! carrying enough context to produce an actionable message.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for imprompt operations.
#[derive(Error, Debug)]
pub enum ImpromptError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No usable API key in config or environment
    #[error("API key not set. Set {env_var} or run `imprompt config set-key`.")]
    MissingApiKey { env_var: String },
}

/// Pipeline errors: image loading and LLM calls.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image file could not be read
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File does not look like a supported image
    #[error("Unsupported format for {path}: {message}")]
    UnsupportedFormat { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Chat completion call failed (provider message preserved verbatim)
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Operation timed out
    #[error("Timeout calling {model} after {timeout_ms}ms")]
    Timeout { model: String, timeout_ms: u64 },
}

/// Convenience type alias for imprompt results.
pub type Result<T> = std::result::Result<T, ImpromptError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
