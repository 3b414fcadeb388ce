//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.endpoint must not be empty".into(),
            ));
        }
        for (key, model) in [
            ("llm.vision_model", &self.llm.vision_model),
            ("llm.primary_model", &self.llm.primary_model),
            ("llm.fallback_model", &self.llm.fallback_model),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must not be empty"
                )));
            }
        }
        if self.llm.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "llm.timeout_ms must be > 0".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        for (key, value) in self.stages.temperatures() {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must be between 0.0 and 2.0"
                )));
            }
        }
        Ok(())
    }
}
