//! Configuration and input validation.
//!
//! Provides validation logic for configuration fields to ensure
//! all required values are present and within valid ranges.

use thiserror::Error;

use crate::config::{Config, NotificationConfig, ObservabilityConfig, StorageConfig};

/// Validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port {port}: must be between 1 and 65535")]
    InvalidPort { port: u16, field: String },

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

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if self.service.port == Some(0) {
            errors.push(ValidationError::InvalidPort {
                port: 0,
                field: "service.port".into(),
            });
        }

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if let Err(e) = self.notification.validate() {
            errors.push(e);
        }

        if let Err(e) = self.storage.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load, apply env overrides, and validate configuration.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        // RUST_LOG style directives are allowed; only the base level is checked.
        let base = self
            .log_level
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if !LOG_LEVELS.contains(&base.as_str()) {
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

impl Validate for NotificationConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !self.enabled {
            return Ok(());
        }

        match self.endpoint.as_deref() {
            None | Some("") => Err(ValidationError::MissingField {
                field: "notification.endpoint".into(),
            }),
            Some(endpoint) if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") => {
                Err(ValidationError::InvalidValue {
                    field: "notification.endpoint".into(),
                    reason: "must be an http(s) URL".into(),
                })
            }
            Some(_) if self.retry_count == 0 => Err(ValidationError::InvalidValue {
                field: "notification.retry_count".into(),
                reason: "must be greater than 0 when notifications are enabled".into(),
            }),
            Some(_) => Ok(()),
        }
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.max_records == 0 {
            return Err(ValidationError::InvalidValue {
                field: "storage.max_records".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}
