//! Output format selection.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::OutputError;

/// How a rendered representation is delivered.
///
/// - `Structural` - The [`Representation`](portrait::Representation) itself
/// - `Json` - Compact JSON text
/// - `JsonPretty` - Indented JSON text
/// - `Yaml` - YAML text
///
/// Parses from and deserializes as `structural`, `json`, `json-pretty` or
/// `yaml`, so it can be picked from a flag or a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Hand back the representation unchanged
    #[default]
    Structural,
    /// Compact JSON
    Json,
    /// Indented JSON
    JsonPretty,
    /// YAML
    Yaml,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::Structural,
        Format::Json,
        Format::JsonPretty,
        Format::Yaml,
    ];

    /// Returns true if this format produces encoded text.
    pub fn is_text(&self) -> bool {
        !matches!(self, Format::Structural)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Structural => "structural",
            Format::Json => "json",
            Format::JsonPretty => "json-pretty",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| OutputError::UnknownFormat(s.to_string()))
    }
}
