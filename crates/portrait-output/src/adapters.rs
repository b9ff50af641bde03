//! Render-then-encode entry points.
//!
//! Each adapter renders `target` with the named template, then hands the
//! result over in its format. Render errors come back as
//! [`OutputError::Render`].

use portrait::{Registry, RenderOptions, Representation, Value};

use crate::encode::{encode, to_json, to_json_pretty, to_yaml, Output, OutputError, Result};
use crate::Format;

/// Renders and returns the representation unchanged.
pub async fn as_structural(
    registry: &Registry,
    target: &Value,
    name: &str,
    options: RenderOptions,
) -> Result<Representation> {
    Ok(registry.represent(target, name, options).await?)
}

/// Renders and encodes as compact JSON.
pub async fn as_json(
    registry: &Registry,
    target: &Value,
    name: &str,
    options: RenderOptions,
) -> Result<String> {
    to_json(&as_structural(registry, target, name, options).await?)
}

/// Renders and encodes as indented JSON.
pub async fn as_json_pretty(
    registry: &Registry,
    target: &Value,
    name: &str,
    options: RenderOptions,
) -> Result<String> {
    to_json_pretty(&as_structural(registry, target, name, options).await?)
}

/// Renders and encodes as YAML.
pub async fn as_yaml(
    registry: &Registry,
    target: &Value,
    name: &str,
    options: RenderOptions,
) -> Result<String> {
    to_yaml(&as_structural(registry, target, name, options).await?)
}

/// Renders and delivers the result in `format`.
pub async fn as_format(
    registry: &Registry,
    target: &Value,
    name: &str,
    options: RenderOptions,
    format: Format,
) -> Result<Output> {
    let rep = as_structural(registry, target, name, options).await?;
    match format {
        Format::Structural => Ok(Output::Structural(rep)),
        text => encode(&rep, text),
    }
}

/// Callback flavor of [`as_format`]. The callback runs exactly once.
pub async fn as_format_with<F>(
    registry: &Registry,
    target: &Value,
    name: &str,
    options: RenderOptions,
    format: Format,
    callback: F,
) where
    F: FnOnce(std::result::Result<Output, OutputError>),
{
    callback(as_format(registry, target, name, options, format).await);
}
