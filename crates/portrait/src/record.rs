//! Plain data objects without a declared type.

use std::sync::Arc;

use crate::traits::Representable;
use crate::value::{Object, Value};

/// An ordered set of named values.
///
/// Records are the plain-data counterpart of typed objects: they carry
/// fields but no type of their own, so templates are usually attached to a
/// specific record rather than to the `Record` type.
///
/// ```
/// use portrait::{Record, Representable};
///
/// let car = Record::new().with("year", 2001).with("make", "Ford");
/// assert_eq!(car.field_names(), vec!["year", "make"]);
/// assert_eq!(car.get("make").and_then(|v| v.as_str()), Some("Ford"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, returning the record (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing any previous value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wraps the record in a shared handle, giving it an identity.
    pub fn into_object(self) -> Object {
        Arc::new(self)
    }
}

impl Representable for Record {
    fn field_value(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or(Value::Absent)
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.into_object())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
