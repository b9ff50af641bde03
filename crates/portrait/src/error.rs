//! Error types for template definition and rendering.
//!
//! Definition errors are returned directly from the `define*` calls.
//! Rendering errors are only ever delivered through the render future (or
//! the callback wrapping it), and the first one aborts the whole render.

use thiserror::Error;

/// Errors that can occur when defining templates or rendering objects.
#[derive(Debug, Error)]
pub enum RepresentError {
    /// The value passed as a definition target cannot host templates.
    #[error("cannot attach templates to a {kind} value; only objects can host templates")]
    InvalidTarget { kind: &'static str },

    /// A template name did not resolve, either as a parent at definition
    /// time or as the requested view at render time.
    #[error("template '{template}' not found for {target}")]
    TemplateNotFound { template: String, target: String },

    /// A define or render call was given an empty template name.
    #[error("a template name is required")]
    MissingTemplateName,

    /// A field formatter failed.
    #[error("failed to resolve field '{field}': {source}")]
    FieldResolution {
        field: String,
        #[source]
        source: FormatError,
    },

    /// The object graph nests deeper than the configured limit.
    #[error("object graph exceeds the maximum render depth of {limit}")]
    DepthLimitExceeded { limit: usize },
}

impl RepresentError {
    pub(crate) fn not_found(template: impl Into<String>, target: impl Into<String>) -> Self {
        RepresentError::TemplateNotFound {
            template: template.into(),
            target: target.into(),
        }
    }
}

/// Error returned by a user-supplied field formatter.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Plain message, for formatters that reject a value without a
    /// structured error of their own.
    #[error("{0}")]
    Message(String),

    /// Any other error raised by the formatter.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl FormatError {
    /// Creates a formatter error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        FormatError::Message(message.into())
    }
}

impl From<String> for FormatError {
    fn from(message: String) -> Self {
        FormatError::Message(message)
    }
}

impl From<&str> for FormatError {
    fn from(message: &str) -> Self {
        FormatError::Message(message.to_string())
    }
}

/// Result type for portrait operations.
pub type Result<T> = std::result::Result<T, RepresentError>;
