//! Encoding of representations into text.
//!
//! Encoders never strip or reorder: map keys come out in template order,
//! and absent values that survived stripping are written as `null`.

use portrait::{RepresentError, Representation};
use thiserror::Error;
use tracing::trace;

use crate::Format;

/// Errors that can occur when producing output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("render failed: {0}")]
    Render(#[from] RepresentError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown output format '{0}'. Expected one of: structural, json, json-pretty, yaml")]
    UnknownFormat(String),
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;

/// A representation delivered in the requested [`Format`].
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Structural(Representation),
    Text(String),
}

impl Output {
    /// The encoded text, if this is a text output.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
            Output::Structural(_) => None,
        }
    }

    pub fn as_structural(&self) -> Option<&Representation> {
        match self {
            Output::Structural(rep) => Some(rep),
            Output::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Output::Text(text) => Some(text),
            Output::Structural(_) => None,
        }
    }
}

/// Encodes a representation in the given format.
pub fn encode(rep: &Representation, format: Format) -> Result<Output> {
    let output = match format {
        Format::Structural => Output::Structural(rep.clone()),
        Format::Json => Output::Text(to_json(rep)?),
        Format::JsonPretty => Output::Text(to_json_pretty(rep)?),
        Format::Yaml => Output::Text(to_yaml(rep)?),
    };
    trace!(%format, "encoded representation");
    Ok(output)
}

/// Encodes as compact JSON.
pub fn to_json(rep: &Representation) -> Result<String> {
    Ok(serde_json::to_string(rep)?)
}

/// Encodes as indented JSON.
pub fn to_json_pretty(rep: &Representation) -> Result<String> {
    Ok(serde_json::to_string_pretty(rep)?)
}

/// Encodes as YAML.
pub fn to_yaml(rep: &Representation) -> Result<String> {
    Ok(serde_yaml::to_string(rep)?)
}
