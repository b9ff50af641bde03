//! The [`Representable`] trait: by-name field access for source objects.
//!
//! Implemented by the `#[derive(Representable)]` macro, by [`Record`](crate::Record),
//! or by hand for types that compute their fields.

use crate::value::{TypeKey, Value};

/// Trait for objects that templates can be attached to and rendered from.
///
/// # Derive Usage
///
/// ```
/// use portrait::Representable;
///
/// #[derive(Representable)]
/// #[represent(rename_all = "camelCase")]
/// struct User {
///     first_name: String,
///     last_name: String,
///     #[represent(skip)]
///     password_hash: String,
/// }
///
/// let user = User {
///     first_name: "Davos".into(),
///     last_name: "Seaworth".into(),
///     password_hash: "x".into(),
/// };
/// assert_eq!(user.field_value("firstName").as_str(), Some("Davos"));
/// assert!(user.field_value("passwordHash").is_absent());
/// ```
///
/// # Manual Implementation
///
/// ```
/// use portrait::{Representable, Value};
///
/// struct Car {
///     year: u16,
///     make: String,
/// }
///
/// impl Representable for Car {
///     fn field_value(&self, name: &str) -> Value {
///         match name {
///             "year" => Value::from(self.year),
///             "make" => Value::from(self.make.as_str()),
///             _ => Value::Absent,
///         }
///     }
///
///     fn field_names(&self) -> Vec<String> {
///         vec!["year".into(), "make".into()]
///     }
/// }
/// ```
pub trait Representable: Send + Sync + 'static {
    /// Returns the raw value of a field.
    ///
    /// Unknown names return [`Value::Absent`].
    fn field_value(&self, name: &str) -> Value;

    /// Returns the names of the object's data fields, in declaration order.
    ///
    /// Used when an object without templates is passed through
    /// structurally. Defaults to no fields.
    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Returns the key that type-bound templates are registered under.
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;
    use std::sync::Arc;

    struct Car {
        year: u16,
    }

    impl Representable for Car {
        fn field_value(&self, name: &str) -> Value {
            match name {
                "year" => Value::from(self.year),
                _ => Value::Absent,
            }
        }
    }

    #[test]
    fn test_manual_impl() {
        let car = Car { year: 2012 };
        assert_eq!(car.field_value("year"), Value::from(2012u16));
        assert!(car.field_value("make").is_absent());
        assert!(car.field_names().is_empty());
    }

    #[test]
    fn test_type_key_through_trait_object() {
        let car: Object = Arc::new(Car { year: 2012 });
        assert_eq!(car.type_key(), TypeKey::of::<Car>());
    }
}
