//! Configuration validation for FeedLens.
//!
//! Ensures policy thresholds are ordered and within range before the
//! engine classifies anything with them.

use thiserror::Error;

use crate::config::{Config, ExportConfig, ObservabilityConfig, PolicyConfig};
use crate::logging::LogFormat;

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

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

impl Validate for Config {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        for result in [
            self.observability.validate(),
            self.policy.validate(),
            self.export.validate(),
        ] {
            match result {
                Ok(()) => {}
                Err(ValidationError::Multiple(nested)) => errors.extend(nested),
                Err(e) => errors.push(e),
            }
        }

        collapse(errors)
    }
}

impl Config {
    /// Load, apply environment overrides and validate.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "observability.log_level".into(),
            });
        }
        if let Err(reason) = self.log_format.parse::<LogFormat>() {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason,
            });
        }
        Ok(())
    }
}

impl Validate for PolicyConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        let percentages = [
            ("policy.high_bias_above", self.high_bias_above),
            ("policy.moderate_bias_above", self.moderate_bias_above),
            ("policy.balanced_below", self.balanced_below),
            ("policy.imbalanced_at", self.imbalanced_at),
            ("policy.over_representation_above", self.over_representation_above),
        ];
        for (field, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                errors.push(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("{value} is not a percentage between 0 and 100"),
                });
            }
        }

        let scores = [
            ("policy.high_priority_above", self.high_priority_above),
            ("policy.strong_strength_at", self.strong_strength_at),
            ("policy.moderate_strength_at", self.moderate_strength_at),
        ];
        for (field, value) in scores {
            if !(0.0..=10.0).contains(&value) {
                errors.push(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("{value} is outside the 0-10 strength scale"),
                });
            }
        }

        if !(self.minority_fraction > 0.0 && self.minority_fraction <= 1.0) {
            errors.push(ValidationError::InvalidValue {
                field: "policy.minority_fraction".into(),
                reason: format!("{} must be a fraction in (0, 1]", self.minority_fraction),
            });
        }

        if self.moderate_bias_above >= self.high_bias_above {
            errors.push(ValidationError::Conflict {
                reason: format!(
                    "policy.moderate_bias_above ({}) must be below policy.high_bias_above ({})",
                    self.moderate_bias_above, self.high_bias_above
                ),
            });
        }
        if self.balanced_below > self.imbalanced_at {
            errors.push(ValidationError::Conflict {
                reason: format!(
                    "policy.balanced_below ({}) must not exceed policy.imbalanced_at ({})",
                    self.balanced_below, self.imbalanced_at
                ),
            });
        }
        if self.moderate_strength_at > self.strong_strength_at {
            errors.push(ValidationError::Conflict {
                reason: format!(
                    "policy.moderate_strength_at ({}) must not exceed policy.strong_strength_at ({})",
                    self.moderate_strength_at, self.strong_strength_at
                ),
            });
        }

        collapse(errors)
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> ValidationResult<()> {
        let prefix = self.file_prefix.trim();
        if prefix.is_empty() {
            return Err(ValidationError::MissingField {
                field: "export.file_prefix".into(),
            });
        }
        if prefix.contains(['/', '\\']) {
            return Err(ValidationError::InvalidValue {
                field: "export.file_prefix".into(),
                reason: "must be a file name, not a path".into(),
            });
        }
        Ok(())
    }
}

fn collapse(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else if errors.len() == 1 {
        Err(errors.remove(0))
    } else {
        Err(ValidationError::Multiple(errors))
    }
}
