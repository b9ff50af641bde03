//! Templates and template sets.
//!
//! A [`Template`] is a named, ordered list of [`Field`]s. Inheritance is
//! resolved once, when the template is built: the stored field list is
//! already merged with the parent's, so rendering never walks a parent
//! chain.
//!
//! # Merge Rule
//!
//! ```text
//! parent:   [a, b]
//! child:        [b', c]
//! resolved: [a, b', c]
//! ```
//!
//! Same-named fields replace the inherited one in place; the child's other
//! fields follow in declaration order.

use std::sync::Arc;

use crate::field::Field;

/// A named view of an object: which fields to render, and how.
///
/// ```
/// use portrait::{Field, Template};
///
/// let public = Template::standalone("public", [Field::new("firstName"), Field::new("lastName")]);
/// let extended = public.extend("extended", [Field::new("lastName").formatter(|_| "S"), Field::new("email")]);
///
/// assert_eq!(extended.field_names(), vec!["firstName", "lastName", "email"]);
/// assert_eq!(extended.parent_name(), Some("public"));
/// assert!(!public.field("lastName").unwrap().has_formatter());
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    fields: Vec<Field>,
    parent: Option<String>,
}

impl Template {
    /// Builds a template that is not attached to anything.
    pub fn standalone(name: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Template {
            name: name.into(),
            fields: merge_fields(&[], fields),
            parent: None,
        }
    }

    /// Builds a template derived from this one.
    pub fn extend(&self, name: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Template {
            name: name.into(),
            fields: merge_fields(&self.fields, fields),
            parent: Some(self.name.clone()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved field list, parent fields included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(Field::name).collect()
    }

    /// Name of the template this one was derived from.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// Merges declared fields over an inherited list.
fn merge_fields(inherited: &[Field], declared: impl IntoIterator<Item = Field>) -> Vec<Field> {
    let mut resolved = inherited.to_vec();
    for field in declared {
        match resolved.iter().position(|f| f.name() == field.name()) {
            Some(index) => resolved[index] = field,
            None => resolved.push(field),
        }
    }
    resolved
}

/// All templates attached to one target, in definition order.
///
/// Sets are published as immutable snapshots; the registry replaces the
/// whole set on every definition.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<Arc<Template>>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Template>> {
        self.templates.iter().find(|t| t.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.iter().any(|t| t.name() == name)
    }

    /// Adds a template, overwriting (in place) any template with the same
    /// name. Returns the replaced template.
    pub fn insert(&mut self, template: Arc<Template>) -> Option<Arc<Template>> {
        match self.templates.iter_mut().find(|t| t.name() == template.name()) {
            Some(slot) => Some(std::mem::replace(slot, template)),
            None => {
                self.templates.push(template);
                None
            }
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Template>> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
