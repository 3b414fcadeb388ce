//! Configuration management for imprompt.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. The resulting `Config` is passed explicitly to the client and
//! pipeline constructors; nothing reads process-wide state after startup
//! except the one-time `${ENV_VAR}` resolution of the API key.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider settings
    pub llm: LlmConfig,

    /// Rate-limit retry settings
    pub retry: RetryConfig,

    /// Per-stage sampling settings
    pub stages: StageConfig,

    /// Input limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.imprompt.imprompt/config.toml
    /// - Linux: ~/.config/imprompt/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\imprompt\config\config.toml
    ///
    /// Falls back to ~/.imprompt/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "imprompt", "imprompt")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = shellexpand::tilde("~").into_owned();
                PathBuf::from(home).join(".imprompt").join("config.toml")
            })
    }

    /// Resolve the API key, following `${ENV_VAR}` indirection.
    ///
    /// Fails fast with `MissingApiKey` so no request is ever sent without
    /// credentials.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        resolve_env_var(&self.llm.api_key).ok_or_else(|| ConfigError::MissingApiKey {
            env_var: self
                .llm
                .api_key_env_var()
                .unwrap_or("GROQ_API_KEY")
                .to_string(),
        })
    }

    /// Whether a key resolves from config or environment.
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_ok()
    }

    /// Replace the in-process API key (the persisted copy is written separately).
    pub fn set_api_key(&mut self, key: &str) {
        self.llm.api_key = key.to_string();
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Plain values pass through; empty values and unset variables yield `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    let value = value.trim();
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 2000);
        assert_eq!(config.llm.primary_model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.fallback_model, "qwen/qwen3-32b");
        assert!(!config.stages.enforce_length_floor);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[llm]"));
        assert!(toml.contains("[retry]"));
        assert!(toml.contains("[stages]"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\napi_key = \"gsk-test\"\n\n[retry]\nbase_delay_ms = 10").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.llm.api_key, "gsk-test");
        assert_eq!(config.retry.base_delay_ms, 10);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.llm.vision_model, LlmConfig::default().vision_model);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retry]\nmax_attempts = 0").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_literal_api_key() {
        let mut config = Config::default();
        config.set_api_key("gsk-literal");
        assert_eq!(config.api_key().unwrap(), "gsk-literal");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let mut config = Config::default();
        config.llm.api_key = "${IMPROMPT_DEFINITELY_NOT_SET_XYZ}".to_string();
        match config.api_key() {
            Err(ConfigError::MissingApiKey { env_var }) => {
                assert_eq!(env_var, "IMPROMPT_DEFINITELY_NOT_SET_XYZ");
            }
            other => panic!("expected MissingApiKey, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_env_var() {
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        assert_eq!(resolve_env_var(""), None);
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }
}
