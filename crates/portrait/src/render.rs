//! The rendering engine.
//!
//! Rendering applies a template to an object and produces a
//! [`Representation`]. For each field of the resolved template, in order:
//!
//! 1. Read the raw value (`object.field_value(name)`)
//! 2. If the field has a formatter, its output is the rendered value
//! 3. If the raw value is an array, render each element: templated objects
//!    recurse, everything else passes through
//! 4. If the raw value is a templated object, recurse
//! 5. Otherwise the raw value passes through unchanged
//!
//! Nested renders use the field's `template` override when it has one and
//! the currently active template name otherwise, so a `public` view of a
//! graph renders every reachable templated object through its own `public`
//! template.
//!
//! # Scheduling
//!
//! Fields of one object are resolved strictly one after another. Elements
//! of a top-level array are rendered concurrently and reassembled in input
//! order. The first error aborts the whole call; pending work is dropped.

use futures::future::{try_join_all, BoxFuture, FutureExt};
use serde::Deserialize;
use tracing::trace;

use crate::error::{RepresentError, Result};
use crate::field::Field;
use crate::registry::Registry;
use crate::representation::{Map, Representation};
use crate::value::{Object, Value};

/// Options for a render call.
///
/// Deserializable from configuration using camelCase keys:
///
/// ```
/// use portrait::RenderOptions;
///
/// let options: RenderOptions = serde_json::from_str(r#"{"stripUndefined": false}"#).unwrap();
/// assert!(!options.strip_undefined);
/// assert_eq!(options.max_depth, RenderOptions::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Remove fields whose rendered value is absent (default `true`).
    /// When `false` they are kept as [`Representation::Absent`].
    pub strip_undefined: bool,
    /// Maximum object nesting depth before the render fails. The top-level
    /// object is at depth 0; arrays and scalars do not add depth.
    pub max_depth: usize,
}

impl RenderOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn strip_undefined(mut self, strip: bool) -> Self {
        self.strip_undefined = strip;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            strip_undefined: true,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Registry {
    /// Renders a single object or an array of objects with the named
    /// template.
    ///
    /// # Errors
    ///
    /// - [`RepresentError::MissingTemplateName`] if `name` is empty
    /// - [`RepresentError::TemplateNotFound`] if the target (or any array
    ///   element, or any nested templated object) has no template `name`
    /// - [`RepresentError::FieldResolution`] if a formatter fails
    /// - [`RepresentError::DepthLimitExceeded`] if the graph nests too deep
    ///
    /// # Example
    ///
    /// ```
    /// use portrait::{DefineOptions, Field, Record, Registry, RenderOptions, Value};
    ///
    /// let registry = Registry::new();
    /// let user = Value::from(Record::new().with("firstName", "Davos").with("secret", 1));
    /// registry.define_for_instance(&user, "public", [Field::new("firstName")], DefineOptions::default())?;
    ///
    /// let rep = futures::executor::block_on(registry.represent(&user, "public", RenderOptions::default()))?;
    /// assert_eq!(rep.get("firstName").and_then(|v| v.as_str()), Some("Davos"));
    /// assert!(!rep.contains_key("secret"));
    /// # Ok::<(), portrait::RepresentError>(())
    /// ```
    pub async fn represent(
        &self,
        target: &Value,
        name: &str,
        options: RenderOptions,
    ) -> Result<Representation> {
        if name.is_empty() {
            return Err(RepresentError::MissingTemplateName);
        }
        trace!(template = name, target = target.kind(), "represent");

        Engine {
            registry: self,
            options,
        }
        .render_target(target, name)
        .await
    }

    /// Callback flavor of [`represent`](Self::represent).
    ///
    /// The callback runs exactly once, when the returned future completes,
    /// with either the representation or the first error.
    pub async fn represent_with<F>(
        &self,
        target: &Value,
        name: &str,
        options: RenderOptions,
        callback: F,
    ) where
        F: FnOnce(Result<Representation>),
    {
        callback(self.represent(target, name, options).await);
    }

    /// Renders on the current thread, blocking until done.
    pub fn represent_blocking(
        &self,
        target: &Value,
        name: &str,
        options: RenderOptions,
    ) -> Result<Representation> {
        futures::executor::block_on(self.represent(target, name, options))
    }
}

struct Engine<'r> {
    registry: &'r Registry,
    options: RenderOptions,
}

impl Engine<'_> {
    /// Renders a top-level target. Array elements are rendered as if each
    /// were passed on its own.
    fn render_target<'a>(
        &'a self,
        target: &'a Value,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Representation>> {
        async move {
            match target {
                Value::Object(object) => self.render_object(object, name, 0).await,
                Value::Array(items) => {
                    let rendered =
                        try_join_all(items.iter().map(|item| self.render_target(item, name)))
                            .await?;
                    Ok(Representation::Array(rendered))
                }
                other => Err(RepresentError::not_found(
                    name,
                    format!("{} value", other.kind()),
                )),
            }
        }
        .boxed()
    }

    fn render_object<'a>(
        &'a self,
        object: &'a Object,
        name: &'a str,
        depth: usize,
    ) -> BoxFuture<'a, Result<Representation>> {
        async move {
            self.check_depth(depth)?;
            let template = self.registry.resolve(object, name).ok_or_else(|| {
                RepresentError::not_found(name, object.type_key().short_name())
            })?;
            trace!(template = name, depth, "rendering object");

            let mut map = Map::with_capacity(template.fields().len());
            for field in template.fields() {
                let raw = object.field_value(field.name());
                let rendered = self.render_field(field, raw, name, depth).await?;
                if self.options.strip_undefined && rendered.is_absent() {
                    continue;
                }
                map.insert(field.name(), rendered);
            }
            Ok(Representation::Map(map))
        }
        .boxed()
    }

    async fn render_field(
        &self,
        field: &Field,
        raw: Value,
        active: &str,
        depth: usize,
    ) -> Result<Representation> {
        if let Some(formatting) = field.apply(&raw) {
            return formatting
                .await
                .map_err(|source| RepresentError::FieldResolution {
                    field: field.name().to_string(),
                    source,
                });
        }

        // Objects found in this field sit one level below their owner,
        // whether held directly or inside an array.
        let nested = field.template_override().unwrap_or(active);
        match &raw {
            Value::Array(items) => {
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(self.render_nested(item, nested, depth + 1).await?);
                }
                Ok(Representation::Array(rendered))
            }
            other => self.render_nested(other, nested, depth + 1).await,
        }
    }

    /// Recurses into templated objects; passes everything else through.
    ///
    /// `depth` is the depth an object at this position has.
    fn render_nested<'a>(
        &'a self,
        value: &'a Value,
        name: &'a str,
        depth: usize,
    ) -> BoxFuture<'a, Result<Representation>> {
        async move {
            match value {
                Value::Object(object) if self.registry.has_templates(object) => {
                    self.render_object(object, name, depth).await
                }
                other => self.passthrough(other, depth),
            }
        }
        .boxed()
    }

    /// Structural copy of a value that has no template of its own.
    ///
    /// Untemplated objects are copied field by field from
    /// [`field_names`](crate::Representable::field_names).
    /// Only objects count toward the depth limit; arrays and scalars do not.
    fn passthrough(&self, value: &Value, depth: usize) -> Result<Representation> {
        Ok(match value {
            Value::Absent => Representation::Absent,
            Value::Null => Representation::Null,
            Value::Bool(b) => Representation::Bool(*b),
            Value::Number(n) => Representation::Number(*n),
            Value::String(s) => Representation::String(s.clone()),
            Value::Array(items) => Representation::Array(
                items
                    .iter()
                    .map(|item| self.passthrough(item, depth))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(object) => {
                self.check_depth(depth)?;
                let mut map = Map::new();
                for name in object.field_names() {
                    let rendered = self.passthrough(&object.field_value(&name), depth + 1)?;
                    map.insert(name, rendered);
                }
                Representation::Map(map)
            }
        })
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(RepresentError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }
}
