//! Portrait - declarative representation templates for object graphs.
//!
//! Portrait lets you attach named *templates* to types or to individual
//! objects, then render any object into a plain structural
//! [`Representation`] by walking the template's fields. It supports:
//!
//! - Type-bound and instance-bound templates, with per-name fallback
//! - Template inheritance, resolved once at definition time
//! - Per-field formatters (sync, fallible, or async)
//! - Recursion into nested templated objects and arrays
//! - Stripping of absent fields
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use portrait::{DefineOptions, Field, Registry, RenderOptions, Representable, Value};
//!
//! #[derive(Representable)]
//! #[represent(rename_all = "camelCase")]
//! struct User {
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! let registry = Registry::new();
//! registry.define_for_type::<User>(
//!     "public",
//!     [Field::new("firstName"), Field::new("lastName")],
//!     DefineOptions::default(),
//! )?;
//! registry.define_for_type::<User>(
//!     "initials",
//!     [Field::new("lastName").formatter(|v| {
//!         v.as_str().and_then(|s| s.chars().next()).map(String::from)
//!     })],
//!     DefineOptions::extends("public"),
//! )?;
//!
//! let user = Value::from(Arc::new(User {
//!     first_name: "Davos".into(),
//!     last_name: "Seaworth".into(),
//! }));
//!
//! let rep = registry.represent_blocking(&user, "initials", RenderOptions::default())?;
//! assert_eq!(rep.get("firstName").and_then(|v| v.as_str()), Some("Davos"));
//! assert_eq!(rep.get("lastName").and_then(|v| v.as_str()), Some("S"));
//! # Ok::<(), portrait::RepresentError>(())
//! ```
//!
//! # Resolution
//!
//! | Step | Source |
//! |------|--------|
//! | 1 | Templates defined on the object itself |
//! | 2 | Templates defined on the object's type |
//!
//! Nested objects are rendered with the field's `template` override, or
//! with the template currently being rendered when there is none.
//!
//! # Global Registry
//!
//! The free functions [`define_for_type`], [`define_for_instance`] and
//! [`represent`] use a process-wide registry, for applications that do not
//! want to thread a [`Registry`] around.

// Lets `#[derive(Representable)]` expand inside this crate too.
extern crate self as portrait;

mod error;
mod field;
mod record;
mod registry;
mod render;
mod representation;
mod template;
mod traits;
mod value;

use std::sync::Arc;

use once_cell::sync::Lazy;

// Re-export public API
pub use error::{FormatError, RepresentError, Result};
pub use field::{Field, FormatFn, FormatFuture};
pub use record::Record;
pub use registry::{DefineOptions, Registry, Target};
pub use render::RenderOptions;
pub use representation::{Map, Representation};
pub use template::{Template, TemplateSet};
pub use traits::Representable;
pub use value::{Number, Object, ToValue, TypeKey, Value};

pub use portrait_macros::Representable;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry used by the free functions.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Defines a template for every instance of `T` in the global registry.
pub fn define_for_type<T: Representable>(
    name: &str,
    fields: impl IntoIterator<Item = Field>,
    options: DefineOptions,
) -> Result<Arc<Template>> {
    global().define_for_type::<T>(name, fields, options)
}

/// Defines a template for one object in the global registry.
pub fn define_for_instance(
    target: &Value,
    name: &str,
    fields: impl IntoIterator<Item = Field>,
    options: DefineOptions,
) -> Result<Arc<Template>> {
    global().define_for_instance(target, name, fields, options)
}

/// Renders with the global registry.
pub async fn represent(
    target: &Value,
    name: &str,
    options: RenderOptions,
) -> Result<Representation> {
    global().represent(target, name, options).await
}
