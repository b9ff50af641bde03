//! Template definition and lookup.
//!
//! [`Registry`] owns every template set and the association between a set
//! and its target. Nothing is stored on the target itself: type-bound sets
//! are keyed by [`TypeKey`], instance-bound sets by the object's allocation,
//! and instance entries hold the object weakly so an association never keeps
//! its object alive.
//!
//! # Resolution Order
//!
//! When rendering an object with template `name`:
//!
//! 1. The object's own (instance-bound) set, if it has `name`
//! 2. The set bound to the object's type, if it has `name`
//! 3. Otherwise the template is not found
//!
//! # Publishing
//!
//! Definitions build a new [`TemplateSet`] and swap it in whole. A failed
//! definition therefore leaves the previous set untouched, and a render in
//! flight keeps working against the snapshot it already holds.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::debug;

use crate::error::{RepresentError, Result};
use crate::field::Field;
use crate::template::{Template, TemplateSet};
use crate::traits::Representable;
use crate::value::{identity, Object, TypeKey, Value};

/// Options for a template definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineOptions {
    /// Name of a template in the same set to inherit fields from.
    pub extends: Option<String>,
}

impl DefineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inherit from the named template.
    pub fn extends(parent: impl Into<String>) -> Self {
        DefineOptions {
            extends: Some(parent.into()),
        }
    }
}

/// What a template definition attaches to.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// Every instance of a type.
    Type(TypeKey),
    /// One specific object.
    Instance(&'a Value),
}

impl Target<'_> {
    /// Target every instance of `T`.
    pub fn of_type<T: Representable>() -> Self {
        Target::Type(TypeKey::of::<T>())
    }
}

struct InstanceEntry {
    object: Weak<dyn Representable>,
    templates: Arc<TemplateSet>,
}

impl InstanceEntry {
    fn is_alive(&self) -> bool {
        self.object.strong_count() > 0
    }
}

/// Storage for type-bound and instance-bound template sets.
///
/// `Registry` is `Send + Sync`. Use one per application, or the shared
/// [`global`](crate::global) registry.
///
/// # Example
///
/// ```
/// use portrait::{DefineOptions, Field, Registry, Representable};
///
/// #[derive(Representable)]
/// struct User {
///     name: String,
///     email: String,
/// }
///
/// let registry = Registry::new();
/// registry.define_for_type::<User>("public", [Field::new("name")], DefineOptions::default())?;
/// let admin = registry.define_for_type::<User>(
///     "admin",
///     [Field::new("email")],
///     DefineOptions::extends("public"),
/// )?;
/// assert_eq!(admin.field_names(), vec!["name", "email"]);
/// # Ok::<(), portrait::RepresentError>(())
/// ```
#[derive(Default)]
pub struct Registry {
    types: RwLock<HashMap<TypeKey, Arc<TemplateSet>>>,
    instances: RwLock<HashMap<usize, InstanceEntry>>,
    /// Instance table size at which the next define sweeps dead entries.
    prune_at: AtomicUsize,
}

/// Smallest instance table size that triggers a sweep on define.
const MIN_PRUNE_WATERMARK: usize = 64;

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a template on a type or an instance.
    pub fn define(
        &self,
        target: Target<'_>,
        name: &str,
        fields: impl IntoIterator<Item = Field>,
        options: DefineOptions,
    ) -> Result<Arc<Template>> {
        match target {
            Target::Type(key) => self.define_for_type_key(key, name, fields, options),
            Target::Instance(value) => self.define_for_instance(value, name, fields, options),
        }
    }

    /// Defines a template shared by every instance of `T`.
    pub fn define_for_type<T: Representable>(
        &self,
        name: &str,
        fields: impl IntoIterator<Item = Field>,
        options: DefineOptions,
    ) -> Result<Arc<Template>> {
        self.define_for_type_key(TypeKey::of::<T>(), name, fields, options)
    }

    /// Defines a template on a type identified by its key.
    pub fn define_for_type_key(
        &self,
        key: TypeKey,
        name: &str,
        fields: impl IntoIterator<Item = Field>,
        options: DefineOptions,
    ) -> Result<Arc<Template>> {
        if name.is_empty() {
            return Err(RepresentError::MissingTemplateName);
        }

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        let current = types.get(&key).cloned().unwrap_or_default();
        let (next, template) = build(&current, name, fields, &options, key.short_name())?;
        types.insert(key, Arc::new(next));

        debug!(
            template = name,
            target = key.short_name(),
            extends = options.extends.as_deref(),
            "defined type template"
        );
        Ok(template)
    }

    /// Defines a template on one object only.
    ///
    /// Any [`Value::Object`] may host templates, whether a typed instance or
    /// a plain [`Record`](crate::Record). Other values have no identity to
    /// attach to and fail with [`RepresentError::InvalidTarget`].
    pub fn define_for_instance(
        &self,
        target: &Value,
        name: &str,
        fields: impl IntoIterator<Item = Field>,
        options: DefineOptions,
    ) -> Result<Arc<Template>> {
        let object = match target {
            Value::Object(object) => object,
            other => return Err(RepresentError::InvalidTarget { kind: other.kind() }),
        };
        if name.is_empty() {
            return Err(RepresentError::MissingTemplateName);
        }

        let key = identity(object);
        let label = instance_label(object);
        let mut instances = self
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // Sweep only once the table has doubled since the last sweep, so
        // defining on many instances stays linear overall. Dead entries
        // still hold their allocation, so their keys cannot be reused.
        if instances.len() >= self.prune_at.load(Ordering::Relaxed) {
            let pruned = self.sweep(&mut instances);
            if pruned > 0 {
                debug!(count = pruned, "pruned dead instance templates");
            }
        }

        let current = instances
            .get(&key)
            .map(|entry| entry.templates.clone())
            .unwrap_or_default();
        let (next, template) = build(&current, name, fields, &options, &label)?;
        instances.insert(
            key,
            InstanceEntry {
                object: Arc::downgrade(object),
                templates: Arc::new(next),
            },
        );

        debug!(
            template = name,
            target = %label,
            extends = options.extends.as_deref(),
            "defined instance template"
        );
        Ok(template)
    }

    /// Finds the template `name` for an object: its own set first, then its
    /// type's.
    pub fn resolve(&self, object: &Object, name: &str) -> Option<Arc<Template>> {
        self.instance_templates(object)
            .and_then(|set| set.get(name))
            .or_else(|| {
                self.type_templates_by_key(object.type_key())
                    .and_then(|set| set.get(name))
            })
    }

    /// Returns `true` if any template set is associated with the object,
    /// directly or through its type.
    pub fn has_templates(&self, object: &Object) -> bool {
        self.instance_templates(object).is_some()
            || self.type_templates_by_key(object.type_key()).is_some()
    }

    /// The set bound to `T`, if any.
    pub fn type_templates<T: Representable>(&self) -> Option<Arc<TemplateSet>> {
        self.type_templates_by_key(TypeKey::of::<T>())
    }

    pub fn type_templates_by_key(&self, key: TypeKey) -> Option<Arc<TemplateSet>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// The set bound directly to this object, if any.
    pub fn instance_templates(&self, object: &Object) -> Option<Arc<TemplateSet>> {
        self.instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&identity(object))
            .filter(|entry| entry.is_alive())
            .map(|entry| entry.templates.clone())
    }

    pub fn template_for_type<T: Representable>(&self, name: &str) -> Option<Arc<Template>> {
        self.type_templates::<T>().and_then(|set| set.get(name))
    }

    /// Looks up a template on the value's own set (no type fallback).
    pub fn template_for_instance(&self, target: &Value, name: &str) -> Option<Arc<Template>> {
        target
            .as_object()
            .and_then(|object| self.instance_templates(object))
            .and_then(|set| set.get(name))
    }

    /// Drops associations whose object no longer exists. Returns how many
    /// were removed.
    pub fn prune(&self) -> usize {
        let mut instances = self
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.sweep(&mut instances)
    }

    fn sweep(&self, instances: &mut HashMap<usize, InstanceEntry>) -> usize {
        let pruned = prune_dead(instances);
        let watermark = (instances.len() * 2).max(MIN_PRUNE_WATERMARK);
        self.prune_at.store(watermark, Ordering::Relaxed);
        pruned
    }

    /// Number of live instance associations.
    pub fn instance_count(&self) -> usize {
        self.instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entry| entry.is_alive())
            .count()
    }
}

/// Builds the next version of a set with `name` defined in it.
///
/// The parent is looked up in `current`, before the new template is
/// inserted, so a template may extend the definition it is replacing.
fn build(
    current: &TemplateSet,
    name: &str,
    fields: impl IntoIterator<Item = Field>,
    options: &DefineOptions,
    target: &str,
) -> Result<(TemplateSet, Arc<Template>)> {
    let template = match &options.extends {
        Some(parent) => current
            .get(parent)
            .ok_or_else(|| RepresentError::not_found(parent.as_str(), target))?
            .extend(name, fields),
        None => Template::standalone(name, fields),
    };

    let template = Arc::new(template);
    let mut next = current.clone();
    next.insert(template.clone());
    Ok((next, template))
}

fn prune_dead(instances: &mut HashMap<usize, InstanceEntry>) -> usize {
    let before = instances.len();
    instances.retain(|_, entry| entry.is_alive());
    before - instances.len()
}

fn instance_label(object: &Object) -> String {
    format!("instance of {}", object.type_key().short_name())
}
