//! Output adapters for Portrait.
//!
//! Portrait renders objects into a [`Representation`](portrait::Representation).
//! This crate delivers that result to callers in the shape they need:
//!
//! | Adapter | Output |
//! |---------|--------|
//! | [`as_structural`] | The representation itself |
//! | [`as_json`] | Compact JSON text |
//! | [`as_json_pretty`] | Indented JSON text |
//! | [`as_yaml`] | YAML text |
//! | [`as_format`] | Any of the above, picked by [`Format`] |
//!
//! Encoding preserves field and sequence order exactly as rendered.
//!
//! # Example
//!
//! ```rust
//! use portrait::{DefineOptions, Field, Record, Registry, RenderOptions, Value};
//! use portrait_output::as_json;
//!
//! let registry = Registry::new();
//! let user = Value::from(Record::new().with("lastName", "Seaworth").with("token", "x"));
//! registry.define_for_instance(&user, "public", [Field::new("lastName")], DefineOptions::default())?;
//!
//! let json = futures::executor::block_on(as_json(&registry, &user, "public", RenderOptions::default()))?;
//! assert_eq!(json, r#"{"lastName":"Seaworth"}"#);
//! # Ok::<(), portrait_output::OutputError>(())
//! ```

mod adapters;
mod encode;
mod format;

pub use adapters::{as_format, as_format_with, as_json, as_json_pretty, as_structural, as_yaml};
pub use encode::{encode, to_json, to_json_pretty, to_yaml, Output, OutputError, Result};
pub use format::Format;
