//! Configuration management for FeedLens.
//!
//! Configuration lives in a single file at `~/.feedlens/config.json`. A
//! missing file is not an error: every field has a default.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (FEEDLENS_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `FEEDLENS_LOG_LEVEL` → observability.log_level
//! - `FEEDLENS_LOG_FORMAT` → observability.log_format
//! - `FEEDLENS_CORPUS` → corpus.path

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".feedlens"),
        |dirs| dirs.home_dir().join(".feedlens"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Policy Constants
// ============================================================================

/// Dominant share (%) above which bias is `High`.
pub const DEFAULT_HIGH_BIAS_ABOVE: f64 = 60.0;

/// Dominant share (%) above which bias is `Moderate`.
pub const DEFAULT_MODERATE_BIAS_ABOVE: f64 = 40.0;

/// Dominant share (%) below which representation is `Balanced`.
pub const DEFAULT_BALANCED_BELOW: f64 = 40.0;

/// Dominant share (%) from which representation is `Imbalanced`.
pub const DEFAULT_IMBALANCED_AT: f64 = 60.0;

/// Fraction of the total below which a group counts as a minority voice.
pub const DEFAULT_MINORITY_FRACTION: f64 = 0.10;

/// Dominant share (%) above which single-group influence is flagged.
pub const DEFAULT_OVER_REPRESENTATION_ABOVE: f64 = 50.0;

/// Strength score above which a comment is high priority.
pub const DEFAULT_HIGH_PRIORITY_ABOVE: f64 = 8.0;

/// Strength score from which an argument is strong.
pub const DEFAULT_STRONG_STRENGTH_AT: f64 = 8.0;

/// Strength score from which an argument is moderate.
pub const DEFAULT_MODERATE_STRENGTH_AT: f64 = 6.0;

/// Default export file name prefix.
pub const DEFAULT_EXPORT_PREFIX: &str = "feedback-analysis";

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Policy Configuration
// ============================================================================

/// Classification thresholds used by the aggregation functions.
///
/// All comparisons against these values are strict; see the engine's
/// `aggregate` module for which side of each boundary a value falls on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_high_bias_above")]
    pub high_bias_above: f64,

    #[serde(default = "default_moderate_bias_above")]
    pub moderate_bias_above: f64,

    #[serde(default = "default_balanced_below")]
    pub balanced_below: f64,

    #[serde(default = "default_imbalanced_at")]
    pub imbalanced_at: f64,

    /// Fraction in (0, 1], not a percentage
    #[serde(default = "default_minority_fraction")]
    pub minority_fraction: f64,

    #[serde(default = "default_over_representation_above")]
    pub over_representation_above: f64,

    #[serde(default = "default_high_priority_above")]
    pub high_priority_above: f64,

    #[serde(default = "default_strong_strength_at")]
    pub strong_strength_at: f64,

    #[serde(default = "default_moderate_strength_at")]
    pub moderate_strength_at: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            high_bias_above: default_high_bias_above(),
            moderate_bias_above: default_moderate_bias_above(),
            balanced_below: default_balanced_below(),
            imbalanced_at: default_imbalanced_at(),
            minority_fraction: default_minority_fraction(),
            over_representation_above: default_over_representation_above(),
            high_priority_above: default_high_priority_above(),
            strong_strength_at: default_strong_strength_at(),
            moderate_strength_at: default_moderate_strength_at(),
        }
    }
}

fn default_high_bias_above() -> f64 {
    DEFAULT_HIGH_BIAS_ABOVE
}

fn default_moderate_bias_above() -> f64 {
    DEFAULT_MODERATE_BIAS_ABOVE
}

fn default_balanced_below() -> f64 {
    DEFAULT_BALANCED_BELOW
}

fn default_imbalanced_at() -> f64 {
    DEFAULT_IMBALANCED_AT
}

fn default_minority_fraction() -> f64 {
    DEFAULT_MINORITY_FRACTION
}

fn default_over_representation_above() -> f64 {
    DEFAULT_OVER_REPRESENTATION_ABOVE
}

fn default_high_priority_above() -> f64 {
    DEFAULT_HIGH_PRIORITY_ABOVE
}

fn default_strong_strength_at() -> f64 {
    DEFAULT_STRONG_STRENGTH_AT
}

fn default_moderate_strength_at() -> f64 {
    DEFAULT_MODERATE_STRENGTH_AT
}

// ============================================================================
// Export / Corpus Configuration
// ============================================================================

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Prefix of suggested export file names
    #[serde(default = "default_export_prefix")]
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_export_prefix(),
        }
    }
}

fn default_export_prefix() -> String {
    DEFAULT_EXPORT_PREFIX.into()
}

/// Where the corpus comes from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorpusConfig {
    /// JSON corpus document. The built-in sample corpus is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JSON Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub corpus: CorpusConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `FEEDLENS_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FEEDLENS_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("FEEDLENS_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(path) = lookup("FEEDLENS_CORPUS").filter(|p| !p.trim().is_empty()) {
            self.corpus.path = Some(PathBuf::from(path));
        }
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
