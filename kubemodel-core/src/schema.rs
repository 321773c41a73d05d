//! Static per-type metadata used to compute patches.
//!
//! Every type deriving [`Tracked`](crate::Tracked) carries a [`TypeSchema`] that is built at compile time.
//! It maps Rust field names to wire names and records, for each field, how the field takes part
//! in a strategic merge: its merge strategy, its merge key and whether it holds nested tracked values.
use crate::{error::SchemaMismatchError, gvk::GroupVersionKind, Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// The structural kind of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// A primitive, or an opaque value that is always replaced as a whole
    Scalar,
    /// A nested tracked object
    Object,
    /// A list (array on the wire)
    List,
    /// A string-keyed map (object on the wire)
    Map,
}

/// The `x-kubernetes-patch-strategy` of a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PatchStrategy {
    /// Lists are merged with the server's copy rather than replaced
    pub merge: bool,
    /// Keys absent from the patched object are cleared on the server (union types)
    pub retain_keys: bool,
}

impl PatchStrategy {
    /// Replace the whole value (the default)
    pub const REPLACE: Self = Self {
        merge: false,
        retain_keys: false,
    };
    /// Merge list elements
    pub const MERGE: Self = Self {
        merge: true,
        retain_keys: false,
    };
    /// Retain only the keys present in the patch
    pub const RETAIN_KEYS: Self = Self {
        merge: false,
        retain_keys: true,
    };
    /// Merge list elements and retain only the keys present in each element
    pub const MERGE_RETAIN_KEYS: Self = Self {
        merge: true,
        retain_keys: true,
    };

    /// The strategy as written in the OpenAPI `x-kubernetes-patch-strategy` extension
    pub fn as_str(&self) -> &'static str {
        match (self.merge, self.retain_keys) {
            (true, true) => "merge,retainKeys",
            (true, false) => "merge",
            (false, true) => "retainKeys",
            (false, false) => "",
        }
    }
}

/// Kind and version of the items held by a list type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListItemKind {
    /// Kind of the items
    pub kind: &'static str,
    /// Api version of the items
    pub version: &'static str,
}

/// Identity of a top level resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    /// API group, empty for the core group
    pub group: &'static str,
    /// API version within the group
    pub version: &'static str,
    /// The resource kind
    pub kind: &'static str,
    /// Plural name used in url paths
    pub plural: &'static str,
    /// Whether the resource lives in a namespace
    pub namespaced: bool,
}

impl ResourceKind {
    /// The `apiVersion` string of the resource
    pub fn api_version(&self) -> String {
        self.gvk().api_version()
    }

    /// The group, version and kind of the resource
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(self.group, self.version, self.kind)
    }
}

/// Metadata for one declared field.
#[derive(Clone, Copy, Debug)]
pub struct FieldSchema {
    /// The Rust field name
    pub name: &'static str,
    /// The serialized name of the field
    pub wire_name: &'static str,
    /// Structural kind of the field
    pub shape: FieldShape,
    /// Whether the field (or its elements) are themselves tracked objects
    pub tracked: bool,
    /// Patch strategy of the field
    pub strategy: PatchStrategy,
    /// Identity key used to match list elements in a strategic merge
    pub merge_key: Option<&'static str>,
    /// Collection fields that serialize even when empty
    pub required: bool,
    /// Schema of the nested object or of the elements
    pub item_schema: Option<fn() -> &'static TypeSchema>,
}

impl FieldSchema {
    /// Whether `name` refers to this field, either by wire name or by Rust name
    pub fn matches(&self, name: &str) -> bool {
        self.wire_name == name || self.name == name
    }

    /// Schema of the nested object or of the list/map elements, if they are tracked
    pub fn item_schema(&self) -> Option<&'static TypeSchema> {
        self.item_schema.map(|f| f())
    }

    /// Whether elements of this list are matched by a merge key in strategic merges
    pub fn is_keyed_list(&self) -> bool {
        self.shape == FieldShape::List && self.merge_key.is_some()
    }

    /// Whether this is a list of primitives merged as a set
    pub fn is_primitive_merge_list(&self) -> bool {
        self.shape == FieldShape::List && self.strategy.merge && self.merge_key.is_none() && !self.tracked
    }
}

/// Metadata for a tracked type.
#[derive(Clone, Copy, Debug)]
pub struct TypeSchema {
    /// The Rust type name
    pub name: &'static str,
    /// Set for top level resource types
    pub resource: Option<ResourceKind>,
    /// Set for types that describe items of a given kind
    pub list_item: Option<ListItemKind>,
    /// The declared fields, in declaration order
    pub fields: &'static [FieldSchema],
}

impl TypeSchema {
    /// Look up a field by wire name or Rust name
    pub fn field(&self, name: &str) -> Option<&'static FieldSchema> {
        let fields: &'static [FieldSchema] = self.fields;
        fields
            .iter()
            .find(|f| f.wire_name == name)
            .or_else(|| fields.iter().find(|f| f.name == name))
    }

    /// Look up a field, failing with a [`SchemaMismatchError`] when it is not declared
    pub fn require(&self, name: &str) -> Result<&'static FieldSchema, SchemaMismatchError> {
        self.field(name).ok_or_else(|| SchemaMismatchError {
            type_name: self.name,
            field: name.to_string(),
        })
    }

    /// The merge key of a list field, if it declares one
    pub fn merge_key(&self, field: &str) -> Option<&'static str> {
        self.field(field).and_then(|f| f.merge_key)
    }

    /// Wire names of all declared fields
    pub fn wire_names(&self) -> impl Iterator<Item = &'static str> + Clone {
        let fields: &'static [FieldSchema] = self.fields;
        fields.iter().map(|f| f.wire_name)
    }
}

/// A lookup table over the schemas of a set of types.
///
/// Built by walking from root types through their nested fields, so registering a resource
/// also registers every type reachable from it.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    types: HashMap<&'static str, &'static TypeSchema>,
    // apiVersion -> kind -> schema
    kinds: HashMap<String, HashMap<&'static str, &'static TypeSchema>>,
}

impl SchemaRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry containing the given roots and every type reachable from them
    pub fn from_roots(roots: impl IntoIterator<Item = &'static TypeSchema>) -> Self {
        let mut registry = Self::new();
        for root in roots {
            registry.register(root);
        }
        registry
    }

    /// Register a schema and everything reachable from it
    pub fn register(&mut self, schema: &'static TypeSchema) {
        let mut pending = vec![schema];
        while let Some(schema) = pending.pop() {
            if let Some(existing) = self.types.get(schema.name) {
                if !std::ptr::eq(*existing, schema) {
                    tracing::debug!(type_name = schema.name, "ignoring second schema with the same type name");
                }
                continue;
            }
            self.types.insert(schema.name, schema);
            if let Some(rk) = &schema.resource {
                self.kinds.entry(rk.api_version()).or_default().insert(rk.kind, schema);
            }
            pending.extend(schema.fields.iter().filter_map(FieldSchema::item_schema));
        }
    }

    /// Look up a type by its Rust name
    pub fn get(&self, type_name: &str) -> Option<&'static TypeSchema> {
        self.types.get(type_name).copied()
    }

    /// Look up a resource type by `apiVersion` and `kind`
    pub fn for_kind(&self, api_version: &str, kind: &str) -> Option<&'static TypeSchema> {
        self.kinds.get(api_version)?.get(kind).copied()
    }

    /// Look up the schema of a serialized object from its `apiVersion` and `kind`
    pub fn for_value(&self, value: &serde_json::Value) -> Result<&'static TypeSchema> {
        let tm = crate::metadata::TypeMeta::deserialize(value)?;
        let gvk = tm.gvk().map_err(|e| Error::Validation(e.to_string()))?;
        tracing::trace!(%gvk, "schema lookup");
        self.for_kind(&gvk.api_version(), &gvk.kind)
            .ok_or_else(|| Error::Validation(format!("no schema registered for {gvk}")))
    }

    /// The merge key of `type_name.field`
    pub fn merge_key(&self, type_name: &str, field: &str) -> Option<&'static str> {
        self.get(type_name).and_then(|s| s.merge_key(field))
    }

    /// Whether `type_name.field` is merged rather than replaced in strategic merges
    pub fn is_merge_field(&self, type_name: &str, field: &str) -> bool {
        self.get(type_name)
            .and_then(|s| s.field(field))
            .is_some_and(|f| f.strategy.merge)
    }

    /// Whether `type_name.field` uses the `retainKeys` strategy
    pub fn retains_keys(&self, type_name: &str, field: &str) -> bool {
        self.get(type_name)
            .and_then(|s| s.field(field))
            .is_some_and(|f| f.strategy.retain_keys)
    }

    /// The item kind declared by a type
    pub fn list_item_kind(&self, type_name: &str) -> Option<ListItemKind> {
        self.get(type_name).and_then(|s| s.list_item)
    }

    /// All registered schemas
    pub fn iter(&self) -> impl Iterator<Item = &'static TypeSchema> + '_ {
        self.types.values().copied()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Check that every merge key names a field of the element type
    pub fn validate(&self) -> Result<()> {
        for schema in self.iter() {
            for field in schema.fields {
                let Some(key) = field.merge_key else { continue };
                let Some(item) = field.item_schema() else {
                    return Err(Error::Validation(format!(
                        "{}.{} declares merge key `{key}` but its elements are not tracked objects",
                        schema.name, field.wire_name
                    )));
                };
                if item.field(key).is_none() {
                    return Err(Error::Validation(format!(
                        "{}.{} declares merge key `{key}` which {} does not declare",
                        schema.name, field.wire_name, item.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static PORT: TypeSchema = TypeSchema {
        name: "Port",
        resource: None,
        list_item: None,
        fields: &[
            FieldSchema {
                name: "container_port",
                wire_name: "containerPort",
                shape: FieldShape::Scalar,
                tracked: false,
                strategy: PatchStrategy::REPLACE,
                merge_key: None,
                required: false,
                item_schema: None,
            },
            FieldSchema {
                name: "protocol",
                wire_name: "protocol",
                shape: FieldShape::Scalar,
                tracked: false,
                strategy: PatchStrategy::REPLACE,
                merge_key: None,
                required: false,
                item_schema: None,
            },
        ],
    };

    fn port() -> &'static TypeSchema {
        &PORT
    }

    static BOX: TypeSchema = TypeSchema {
        name: "Box",
        resource: Some(ResourceKind {
            group: "example.dev",
            version: "v1",
            kind: "Box",
            plural: "boxes",
            namespaced: true,
        }),
        list_item: Some(ListItemKind {
            kind: "Port",
            version: "v1",
        }),
        fields: &[
            FieldSchema {
                name: "ports",
                wire_name: "ports",
                shape: FieldShape::List,
                tracked: true,
                strategy: PatchStrategy::MERGE,
                merge_key: Some("containerPort"),
                required: false,
                item_schema: Some(port),
            },
            FieldSchema {
                name: "finalizers",
                wire_name: "finalizers",
                shape: FieldShape::List,
                tracked: false,
                strategy: PatchStrategy::MERGE,
                merge_key: None,
                required: false,
                item_schema: None,
            },
        ],
    };

    static BROKEN: TypeSchema = TypeSchema {
        name: "Broken",
        resource: None,
        list_item: None,
        fields: &[FieldSchema {
            name: "ports",
            wire_name: "ports",
            shape: FieldShape::List,
            tracked: true,
            strategy: PatchStrategy::MERGE,
            merge_key: Some("port"),
            required: false,
            item_schema: Some(port),
        }],
    };

    #[test]
    fn field_lookup_by_either_name() {
        assert_eq!(PORT.field("containerPort").unwrap().name, "container_port");
        assert_eq!(PORT.field("container_port").unwrap().wire_name, "containerPort");
        let err = PORT.require("hostPort").unwrap_err();
        assert_eq!(err.type_name, "Port");
        assert_eq!(err.field, "hostPort");
    }

    #[test]
    fn registry_walks_nested_types() {
        let reg = SchemaRegistry::from_roots([&BOX]);
        assert_eq!(reg.len(), 2);
        assert!(reg.get("Port").is_some());
        assert_eq!(reg.merge_key("Box", "ports"), Some("containerPort"));
        assert_eq!(reg.merge_key("Box", "finalizers"), None);
        assert!(reg.is_merge_field("Box", "finalizers"));
        assert!(!reg.retains_keys("Box", "ports"));
        assert_eq!(reg.list_item_kind("Box").unwrap().kind, "Port");
        assert_eq!(reg.for_kind("example.dev/v1", "Box").unwrap().name, "Box");
        assert!(reg.for_kind("v1", "Box").is_none());
        assert!(reg.for_kind("example.dev/v1", "Port").is_none());
        reg.validate().unwrap();
    }

    #[test]
    fn registry_rejects_unknown_merge_key() {
        let reg = SchemaRegistry::from_roots([&BROKEN]);
        let err = reg.validate().unwrap_err();
        assert!(err.to_string().contains("merge key `port`"));
    }

    #[test]
    fn strategy_strings() {
        assert_eq!(PatchStrategy::MERGE_RETAIN_KEYS.as_str(), "merge,retainKeys");
        assert_eq!(PatchStrategy::RETAIN_KEYS.as_str(), "retainKeys");
        assert_eq!(PatchStrategy::default(), PatchStrategy::REPLACE);
        assert!(BOX.fields[1].is_primitive_merge_list());
        assert!(BOX.fields[0].is_keyed_list());
    }
}
