//! Runtime value types read from source objects.
//!
//! The [`Value`] enum is what a template field sees when it reads
//! `target[field]`. Scalars are copied out of the source; objects stay
//! shared handles ([`Object`]) so that their identity survives the read and
//! instance-bound templates can still be found for them.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::traits::Representable;

/// Shared handle to a source object.
///
/// The allocation behind the handle is the object's instance identity:
/// two clones of the same `Object` resolve the same instance-bound
/// templates.
pub type Object = Arc<dyn Representable>;

/// Returns the instance identity of an object (its allocation address).
pub(crate) fn identity(object: &Object) -> usize {
    Arc::as_ptr(object) as *const () as usize
}

/// Type identity used to bind templates to every instance of a type.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The unqualified type name (`User` rather than `my_app::model::User`).
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        let start = base.rfind("::").map(|i| i + 2).unwrap_or(0);
        &self.name[start..]
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

/// A raw value read from a source object.
///
/// # Example
///
/// ```
/// use portrait::{Record, Value};
///
/// let car = Record::new().with("year", 2001).with("make", "Ford");
/// let value = Value::from(car);
/// assert!(value.is_object());
/// assert_eq!(Value::from("Davos").as_str(), Some("Davos"));
/// assert!(Value::from(None::<String>).is_absent());
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// The field is missing or explicitly undefined.
    #[default]
    Absent,
    /// An explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Shared handle to a nested object.
    Object(Object),
}

impl Value {
    /// Returns `true` if this is the absent sentinel.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Returns `true` if this is an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this is an ordered sequence.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if this is an object handle.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the sequence, if present.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Extracts the object handle, if present.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "Absent"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({:?})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Object(object) => write!(f, "Object({})", object.type_key().short_name()),
        }
    }
}

/// Objects compare by identity, everything else by content.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => identity(a) == identity(b),
            _ => false,
        }
    }
}

/// Numeric value, stored in the widest variant that keeps precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns the number as i64 if it is an integer that fits.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::I64(n) => Some(n),
            Number::U64(n) => i64::try_from(n).ok(),
            Number::F64(_) => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident, $wide:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as $wide)
                }
            }

            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

number_from!(I64, i64: i8, i16, i32, i64, isize);
number_from!(U64, u64: u8, u16, u32, u64, usize);
number_from!(F64, f64: f32, f64);

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Absent)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Representable> From<Arc<T>> for Value {
    fn from(object: Arc<T>) -> Self {
        Value::Object(object)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

/// Conversion used by derived [`Representable`] impls to read a field
/// without moving it out of the struct.
///
/// Implemented for every `Clone` type convertible into [`Value`]. Nested
/// objects must be held as `Arc<T>` so that the read keeps their identity.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl<T: Clone + Into<Value>> ToValue for T {
    fn to_value(&self) -> Value {
        self.clone().into()
    }
}
