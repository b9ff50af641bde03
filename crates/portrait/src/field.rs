//! Field descriptors: how one named property is rendered.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::FormatError;
use crate::representation::Representation;
use crate::value::Value;

/// Future returned by a field formatter.
pub type FormatFuture = BoxFuture<'static, std::result::Result<Representation, FormatError>>;

/// A field formatter. Every formatter flavor is stored in this form.
pub type FormatFn = dyn Fn(Value) -> FormatFuture + Send + Sync;

/// Describes how to render one named property of an object.
///
/// A field reads `target[name]` and then either hands the raw value to its
/// formatter, or renders it structurally (recursing into templated
/// objects, using [`template`](Field::template) as the nested view name
/// when set).
///
/// Fields are immutable once built; cloning shares the formatter.
///
/// # Example
///
/// ```
/// use portrait::{Field, Representation};
///
/// let initial = Field::new("lastName").formatter(|value| {
///     value.as_str().and_then(|s| s.chars().next()).map(String::from)
/// });
/// let car = Field::new("car").template("summary");
///
/// assert!(initial.has_formatter());
/// assert_eq!(car.template_override(), Some("summary"));
/// ```
#[derive(Clone)]
pub struct Field {
    name: String,
    formatter: Option<Arc<FormatFn>>,
    template: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            formatter: None,
            template: None,
        }
    }

    /// Sets a synchronous formatter. Its result is the field's rendered
    /// value; no further recursion happens.
    pub fn formatter<F, R>(self, f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Representation>,
    {
        self.with_format_fn(move |value| {
            let rendered: Representation = f(&value).into();
            future::ready(Ok(rendered)).boxed()
        })
    }

    /// Sets a formatter that can fail. A failure aborts the whole render.
    pub fn try_formatter<F, R, E>(self, f: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: Into<Representation>,
        E: Into<FormatError>,
    {
        self.with_format_fn(move |value| {
            let result: std::result::Result<Representation, FormatError> =
                f(&value).map(Into::into).map_err(Into::into);
            future::ready(result).boxed()
        })
    }

    /// Sets an asynchronous formatter.
    ///
    /// The render of the enclosing object waits for it before moving on to
    /// the next field.
    pub fn async_formatter<F, Fut, R, E>(self, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
        R: Into<Representation>,
        E: Into<FormatError>,
    {
        self.with_format_fn(move |value| {
            let pending = f(value);
            async move {
                let result: std::result::Result<Representation, FormatError> =
                    pending.await.map(Into::into).map_err(Into::into);
                result
            }
            .boxed()
        })
    }

    /// Renders nested templated values with this template instead of the
    /// currently active one.
    pub fn template(mut self, name: impl Into<String>) -> Self {
        self.template = Some(name.into());
        self
    }

    fn with_format_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> FormatFuture + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template_override(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    /// Runs the formatter on a raw value, if the field has one.
    ///
    /// The value is only cloned when there is a formatter to hand it to.
    pub fn apply(&self, raw: &Value) -> Option<FormatFuture> {
        self.formatter.as_ref().map(|f| f(raw.clone()))
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .field("template", &self.template)
            .finish()
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::new(name)
    }
}
