//! FeedLens Common - shared error, logging and configuration types.
//!
//! This crate provides:
//! - The workspace error type and result alias
//! - Logging setup
//! - Configuration types and loading (policy thresholds, export naming)
//! - Configuration validation

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{Config, CorpusConfig, ExportConfig, ObservabilityConfig, PolicyConfig};
pub use error::{Error, Result, ResultExt};
pub use validation::{Validate, ValidationError, ValidationResult};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, PolicyConfig};
    pub use crate::error::{Error, Result, ResultExt};
    pub use crate::logging::init_logging;
    pub use crate::validation::{Validate, ValidationError};
}
