//! Per-instance change tracking.
//!
//! Every tracked object owns a [`ModificationSet`] recording the wire names of the fields
//! assigned since the object was constructed. Setters generated by
//! [`#[derive(Tracked)]`](kubemodel_derive::Tracked) record into it; deserialization does not.
use crate::{
    collections::MapChanges,
    error::SchemaMismatchError,
    schema::{FieldSchema, TypeSchema},
    Result,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{btree_set, BTreeSet};

pub use serde_json::Value;

/// The set of modified field names of one object.
///
/// Insertion is idempotent and there is no removal: the set only grows until the owning
/// object is dropped. Iteration order is not part of the contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModificationSet {
    names: BTreeSet<&'static str>,
}

impl ModificationSet {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field as modified, returning whether it was newly recorded
    ///
    /// Callers are expected to pass declared wire names only; use
    /// [`Tracked::mark_modified`] to mark a field by a name that has not been validated.
    pub fn insert(&mut self, wire_name: &'static str) -> bool {
        self.names.insert(wire_name)
    }

    /// Whether the field has been recorded
    pub fn contains(&self, wire_name: &str) -> bool {
        self.names.contains(wire_name)
    }

    /// The recorded field names
    ///
    /// The iterator is lazy and can be restarted by cloning it.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.names.iter())
    }

    /// Number of recorded fields
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModificationSet {
    type IntoIter = Iter<'a>;
    type Item = &'static str;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the names in a [`ModificationSet`]
#[derive(Clone, Debug)]
pub struct Iter<'a>(btree_set::Iter<'a, &'static str>);

impl Iterator for Iter<'_> {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// A record type whose field assignments are tracked.
///
/// Implemented by [`#[derive(Tracked)]`](kubemodel_derive::Tracked). The dynamic accessors accept
/// either the wire name or the Rust name of a field and fail with a [`SchemaMismatchError`]
/// for names the type does not declare.
///
/// A tracked object is plain mutable data: mutation from several threads needs external
/// synchronization, while shared read-only access (e.g. building several patches) is fine.
pub trait Tracked {
    /// The static schema of this type, without an instance
    fn static_schema() -> &'static TypeSchema
    where
        Self: Sized;

    /// The static schema of this type
    fn schema(&self) -> &'static TypeSchema;

    /// Names recorded by setters on this object
    ///
    /// This does not include collections changed in place; use [`Tracked::is_modified`]
    /// or [`Tracked::modified_fields`] for the complete picture.
    fn modifications(&self) -> &ModificationSet;

    /// Mutable access to the recorded names, for generated code
    #[doc(hidden)]
    fn modifications_mut(&mut self) -> &mut ModificationSet;

    /// Record a field as modified without changing its value
    fn mark_modified(&mut self, field: &str) -> Result<()> {
        let field = self.schema().require(field)?;
        self.modifications_mut().insert(field.wire_name);
        Ok(())
    }

    /// Whether a field was assigned, or (for collections) changed in place
    fn is_modified(&self, field: &str) -> Result<bool>;

    /// Whether this object or anything nested in it has been modified
    fn is_dirty(&self) -> bool;

    /// The current value of a field in its wire representation
    fn get(&self, field: &str) -> Result<Value>;

    /// Assign a field from its wire representation and record it as modified
    ///
    /// When `value` does not deserialize into the field's type the object is left untouched.
    fn set(&mut self, field: &str, value: Value) -> Result<()>;

    /// A view of a field suitable for walking nested tracked values
    fn field(&self, field: &str) -> Result<FieldRef<'_>>;

    /// Serialize the whole object
    fn to_value(&self) -> Result<Value>;

    /// Lazily iterate the wire names of modified fields, in declaration order
    fn modified_fields(&self) -> ModifiedFields<'_, Self>
    where
        Self: Sized,
    {
        ModifiedFields::new(self)
    }
}

/// Iterator over the modified fields of a tracked object.
///
/// Created by [`Tracked::modified_fields`], or with [`ModifiedFields::new`] for trait objects.
pub struct ModifiedFields<'a, T: ?Sized> {
    object: &'a T,
    fields: std::slice::Iter<'static, FieldSchema>,
}

impl<'a, T: Tracked + ?Sized> ModifiedFields<'a, T> {
    /// Iterate the modified fields of `object`
    pub fn new(object: &'a T) -> Self {
        let fields: &'static [FieldSchema] = object.schema().fields;
        Self {
            object,
            fields: fields.iter(),
        }
    }
}

impl<T: ?Sized> Clone for ModifiedFields<'_, T> {
    fn clone(&self) -> Self {
        Self {
            object: self.object,
            fields: self.fields.clone(),
        }
    }
}

impl<T: Tracked + ?Sized> Iterator for ModifiedFields<'_, T> {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        self.fields
            .by_ref()
            .find(|f| matches!(self.object.is_modified(f.wire_name), Ok(true)))
            .map(|f| f.wire_name)
    }
}

/// A borrowed view of one field of a tracked object.
pub enum FieldRef<'a> {
    /// A scalar in its wire representation
    Scalar(Value),
    /// A nested tracked object, `None` when unset
    Object(Option<&'a dyn Tracked>),
    /// A list
    List(ListRef<'a>),
    /// A string-keyed map
    Map(MapRef<'a>),
}

/// One element of a list or map field.
pub enum Element<'a> {
    /// A plain value in its wire representation
    Value(Value),
    /// A tracked object
    Object(&'a dyn Tracked),
}

impl<'a> Element<'a> {
    /// The full wire representation of the element
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Element::Value(v) => Ok(v.clone()),
            Element::Object(o) => o.to_value(),
        }
    }

    /// The element as a tracked object, if it is one
    pub fn as_tracked(&self) -> Option<&'a dyn Tracked> {
        match self {
            Element::Value(_) => None,
            Element::Object(o) => Some(*o),
        }
    }
}

/// View of a list field.
pub struct ListRef<'a> {
    /// Whether the list was changed structurally (assigned, pushed to, removed from, ...)
    pub changed: bool,
    /// The current elements
    pub elements: Vec<Element<'a>>,
}

/// View of a map field.
pub struct MapRef<'a> {
    /// Keys changed since construction
    pub changes: &'a MapChanges,
    /// The current entries
    pub entries: Vec<(&'a str, Element<'a>)>,
}

/// Serialize a field value, mapping failures into [`Error`](crate::Error)
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Deserialize a field value, mapping failures into [`Error`](crate::Error)
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// The [`SchemaMismatchError`] for `field` on `schema`
pub fn mismatch(schema: &TypeSchema, field: &str) -> SchemaMismatchError {
    SchemaMismatchError {
        type_name: schema.name,
        field: field.to_string(),
    }
}
