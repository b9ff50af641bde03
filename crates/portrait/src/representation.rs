//! Rendered output: plain structural data with no ties to the source.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::value::Number;

/// The structural result of rendering an object through a template.
///
/// A representation owns all of its data. Maps keep the field order of
/// the template that produced them. [`Representation::Absent`] only
/// appears when rendering with `strip_undefined` turned off, and
/// serializes as `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Representation {
    #[default]
    Absent,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Representation>),
    Map(Map),
}

impl Representation {
    pub fn is_absent(&self) -> bool {
        matches!(self, Representation::Absent)
    }

    /// Looks up a key when this is a map.
    pub fn get(&self, key: &str) -> Option<&Representation> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Returns `true` when this is a map containing `key` (even if its
    /// value is absent).
    pub fn contains_key(&self, key: &str) -> bool {
        self.as_map().is_some_and(|map| map.contains_key(key))
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Representation::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Representation]> {
        match self {
            Representation::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Representation::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Representation::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Ordered string-keyed map of rendered fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    entries: Vec<(String, Representation)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Map {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts a value, replacing an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Representation) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Representation> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Representation)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Representation)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, Representation)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::I64(n) => serializer.serialize_i64(n),
            Number::U64(n) => serializer.serialize_u64(n),
            Number::F64(n) => serializer.serialize_f64(n),
        }
    }
}

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Representation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Representation::Absent | Representation::Null => serializer.serialize_none(),
            Representation::Bool(b) => serializer.serialize_bool(*b),
            Representation::Number(n) => n.serialize(serializer),
            Representation::String(s) => serializer.serialize_str(s),
            Representation::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Representation::Map(map) => map.serialize(serializer),
        }
    }
}

macro_rules! representation_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Representation {
                fn from(n: $ty) -> Self {
                    Representation::Number(Number::from(n))
                }
            }
        )*
    };
}

representation_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Number> for Representation {
    fn from(n: Number) -> Self {
        Representation::Number(n)
    }
}

impl From<bool> for Representation {
    fn from(b: bool) -> Self {
        Representation::Bool(b)
    }
}

impl From<String> for Representation {
    fn from(s: String) -> Self {
        Representation::String(s)
    }
}

impl From<&str> for Representation {
    fn from(s: &str) -> Self {
        Representation::String(s.to_string())
    }
}

impl<T: Into<Representation>> From<Option<T>> for Representation {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Representation::Absent)
    }
}

impl<T: Into<Representation>> From<Vec<T>> for Representation {
    fn from(items: Vec<T>) -> Self {
        Representation::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Map> for Representation {
    fn from(map: Map) -> Self {
        Representation::Map(map)
    }
}

impl From<serde_json::Value> for Representation {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Representation::Null,
            Json::Bool(b) => Representation::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Representation::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Representation::Number(Number::U64(u))
                } else {
                    Representation::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Json::String(s) => Representation::String(s),
            Json::Array(items) => {
                Representation::Array(items.into_iter().map(Representation::from).collect())
            }
            Json::Object(obj) => Representation::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, Representation::from(v)))
                    .collect(),
            ),
        }
    }
}
