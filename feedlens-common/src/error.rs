//! Error types for the FeedLens workspace.

use thiserror::Error;

/// Result type alias using the FeedLens error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for FeedLens crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A percentage or dominance computation was strictly required over a
    /// distribution whose total is zero.
    #[error("Empty distribution: {0}")]
    EmptyDistribution(String),

    /// A label was resolved against the corpus and is not present in it.
    #[error("Unknown {kind} label: {label}")]
    UnknownLabel { kind: String, label: String },

    /// Blank or otherwise unusable label text
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    /// A comment handed to the export formatter violates the record shape.
    #[error("Malformed export input (comment {id}): {reason}")]
    MalformedExportInput { id: String, reason: String },

    /// The corpus document could not be parsed or validated
    #[error("Malformed corpus: {0}")]
    MalformedCorpus(String),

    /// A navigation request lacks a parameter its target view needs
    #[error("Invalid navigation: {0}")]
    InvalidNavigation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for an [`Error::UnknownLabel`].
    pub fn unknown_label(kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self::UnknownLabel {
            kind: kind.into(),
            label: label.into(),
        }
    }

    /// Shorthand for an [`Error::MalformedExportInput`].
    pub fn malformed_export(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedExportInput {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from structurally invalid data (as opposed to
    /// configuration or environment problems).
    ///
    /// Presentation layers show these as a "data error".
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::MalformedExportInput { .. }
            | Self::MalformedCorpus(_)
            | Self::InvalidLabel(_)
            | Self::EmptyDistribution(_) => true,
            Self::WithContext { source, .. } => source.is_data_error(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}
