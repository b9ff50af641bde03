//! Proc macros for Portrait.
//!
//! # Available Macros
//!
//! - [`Representable`] - Expose a struct's fields to representation templates
//!
//! The generated implementation reads fields by their exposed name and
//! converts them with `portrait::ToValue`, so every field type must be
//! `Clone + Into<portrait::Value>` unless it is skipped.

mod representable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Representable` trait for structs with named fields.
///
/// # Container Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `rename_all = "..."` | `camelCase`, `PascalCase`, `kebab-case` or `SCREAMING_SNAKE_CASE` |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Hide this field from templates |
/// | `rename = "..."` | Use a custom exposed name |
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `User::FIRST_NAME`) holding the exposed name
/// 2. `field_value`, returning `Value::Absent` for unknown names
/// 3. `field_names`, in declaration order
///
/// # Example
///
/// ```ignore
/// use portrait::{Field, Representable};
///
/// #[derive(Representable)]
/// #[represent(rename_all = "camelCase")]
/// struct User {
///     first_name: String,
///     #[represent(skip)]
///     password_hash: String,
/// }
///
/// let fields = [Field::new(User::FIRST_NAME)];
/// ```
#[proc_macro_derive(Representable, attributes(represent))]
pub fn representable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    representable::representable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
