//! Configuration validation.
//!
//! Checks that every configuration section holds values the services can
//! actually run with.

use thiserror::Error;

use crate::config::{AssistantConfig, AuthConfig, Config, ObservabilityConfig};
use crate::latency::Latency;

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["json", "pretty"];

/// Argon2 rejects memory costs below 8 KiB per lane.
const MIN_HASH_MEMORY_KIB: u32 = 8;

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors: Vec<ValidationError> = [
            self.auth.validate(),
            self.assistant.validate(),
            self.observability.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

fn check_latency(field: &str, latency: &Latency) -> ValidationResult<()> {
    if latency.min_ms > latency.max_ms {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!(
                "min_ms ({}) is greater than max_ms ({})",
                latency.min_ms, latency.max_ms
            ),
        });
    }
    Ok(())
}

impl Validate for AuthConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.min_secret_len == 0 {
            return Err(ValidationError::InvalidValue {
                field: "auth.min_secret_len".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.hash_memory_kib < MIN_HASH_MEMORY_KIB {
            return Err(ValidationError::InvalidValue {
                field: "auth.hash_memory_kib".into(),
                reason: format!("must be at least {MIN_HASH_MEMORY_KIB}"),
            });
        }
        if self.hash_iterations == 0 {
            return Err(ValidationError::InvalidValue {
                field: "auth.hash_iterations".into(),
                reason: "must be at least 1".into(),
            });
        }

        let l = &self.latency;
        check_latency("auth.latency.sign_in", &l.sign_in)?;
        check_latency("auth.latency.sign_up", &l.sign_up)?;
        check_latency("auth.latency.sign_out", &l.sign_out)?;
        check_latency("auth.latency.profile_read", &l.profile_read)?;
        check_latency("auth.latency.profile_write", &l.profile_write)
    }
}

impl Validate for AssistantConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "assistant.model".into(),
            });
        }
        check_latency("assistant.chat_latency", &self.chat_latency)?;
        check_latency("assistant.generation_latency", &self.generation_latency)?;
        check_latency("assistant.status_latency", &self.status_latency)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
            });
        }
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            });
        }
        Ok(())
    }
}
