use super::{Patch, PATCH_DIRECTIVE, RETAIN_KEYS_DIRECTIVE};
use crate::{
    error::MissingMergeKeyError,
    schema::{FieldSchema, TypeSchema},
    tracking::{Element, FieldRef, ListRef, MapRef, Tracked},
    Result,
};
use serde_json::{json, Map, Value};

/// The patch format produced by a [`PatchBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchKind {
    /// RFC 7396 JSON merge patch, sent as `application/merge-patch+json`
    Merge,
    /// Kubernetes strategic merge patch, sent as `application/strategic-merge-patch+json`
    Strategic,
}

/// Builds patch documents from the modifications recorded on tracked objects.
///
/// Only modified fields are emitted. Nested tracked objects that were edited in place produce
/// nested partial patches, while reassigned ones are emitted whole. Lists are replaced as a
/// whole, except for merge-keyed lists in a strategic patch, where each edited element is emitted
/// on its own with its merge key so that the server can find it.
///
/// A strategic patch marks reassigned objects with `$patch: replace`, so the server drops
/// whatever the new value leaves out. Merge patches have no such directive: the server merges
/// a reassigned object into the one it has, keeping fields only it knows about.
///
/// ```
/// use kubemodel_core::{metadata::ObjectMeta, patch::PatchBuilder};
/// use serde_json::json;
///
/// let mut meta: ObjectMeta = serde_json::from_value(json!({
///     "name": "web",
///     "labels": {"app": "web", "tier": "frontend"}
/// })).unwrap();
/// meta.labels_mut().remove("tier");
/// meta.set_generate_name("web-");
///
/// let patch = PatchBuilder::strategic().build_value(&meta).unwrap();
/// assert_eq!(patch, json!({"generateName": "web-", "labels": {"tier": null}}));
/// ```
#[derive(Clone, Debug)]
pub struct PatchBuilder {
    kind: PatchKind,
    include_type_meta: bool,
    retain_keys: bool,
}

impl PatchBuilder {
    /// A builder for JSON merge patches
    pub fn merge() -> Self {
        Self {
            kind: PatchKind::Merge,
            include_type_meta: false,
            retain_keys: false,
        }
    }

    /// A builder for strategic merge patches
    pub fn strategic() -> Self {
        Self {
            kind: PatchKind::Strategic,
            include_type_meta: false,
            retain_keys: true,
        }
    }

    /// The format produced
    pub fn kind(&self) -> PatchKind {
        self.kind
    }

    /// Add `apiVersion` and `kind` to patches of resource types
    #[must_use]
    pub fn include_type_meta(mut self, include: bool) -> Self {
        self.include_type_meta = include;
        self
    }

    /// Emit `$retainKeys` for in-place edits of fields with the `retainKeys` strategy
    ///
    /// Has no effect on merge patches, or on reassigned objects which are replaced anyway.
    #[must_use]
    pub fn retain_keys(mut self, retain: bool) -> Self {
        self.retain_keys = retain;
        self
    }

    /// Build the patch document for `obj`
    ///
    /// Fails without producing any output when a merge-keyed list element has no key.
    #[tracing::instrument(skip_all, fields(type_name = obj.schema().name, kind = ?self.kind))]
    pub fn build_value(&self, obj: &dyn Tracked) -> Result<Value> {
        let mut patch = self.object_patch(obj)?;
        if self.include_type_meta {
            if let Some(rk) = &obj.schema().resource {
                patch.insert("apiVersion".into(), Value::String(rk.api_version()));
                patch.insert("kind".into(), Value::String(rk.kind.into()));
            }
        }
        tracing::debug!(fields = patch.len(), "built patch");
        Ok(Value::Object(patch))
    }

    /// Build the patch for `obj`, wrapped in the matching [`Patch`] variant
    pub fn build(&self, obj: &dyn Tracked) -> Result<Patch<Value>> {
        let body = self.build_value(obj)?;
        Ok(match self.kind {
            PatchKind::Merge => Patch::Merge(body),
            PatchKind::Strategic => Patch::Strategic(body),
        })
    }

    fn is_strategic(&self) -> bool {
        self.kind == PatchKind::Strategic
    }

    fn object_patch(&self, obj: &dyn Tracked) -> Result<Map<String, Value>> {
        let schema = obj.schema();
        let mut patch = Map::new();
        for field in schema.fields {
            if let Some(value) = self.field_patch(obj, schema, field)? {
                tracing::trace!(type_name = schema.name, field = field.wire_name, "emitting field");
                patch.insert(field.wire_name.to_string(), value);
            }
        }
        Ok(patch)
    }

    fn field_patch(
        &self,
        obj: &dyn Tracked,
        schema: &'static TypeSchema,
        field: &'static FieldSchema,
    ) -> Result<Option<Value>> {
        let assigned = obj.modifications().contains(field.wire_name);
        match obj.field(field.wire_name)? {
            FieldRef::Scalar(value) => Ok(assigned.then_some(value)),
            FieldRef::Object(None) => Ok(assigned.then_some(Value::Null)),
            FieldRef::Object(Some(child)) => {
                if assigned {
                    Ok(Some(self.replacing(child.to_value()?)))
                } else if child.is_dirty() {
                    let partial = Value::Object(self.object_patch(child)?);
                    Ok(Some(self.with_retain_keys_of(field, partial, child)?))
                } else {
                    Ok(None)
                }
            }
            FieldRef::List(list) => self.list_patch(schema, field, assigned, list),
            FieldRef::Map(map) => self.map_patch(field, assigned, map),
        }
    }

    fn list_patch(
        &self,
        schema: &'static TypeSchema,
        field: &'static FieldSchema,
        assigned: bool,
        list: ListRef<'_>,
    ) -> Result<Option<Value>> {
        let changed = assigned || list.changed;
        let merge_key = field.merge_key.filter(|_| self.is_strategic());

        let Some(key) = merge_key else {
            let any_dirty = list
                .elements
                .iter()
                .any(|e| e.as_tracked().is_some_and(|o| o.is_dirty()));
            if !(changed || any_dirty) {
                return Ok(None);
            }
            if list.elements.is_empty() {
                return Ok(Some(cleared(field)));
            }
            let items = list.elements.iter().map(Element::to_value).collect::<Result<_>>()?;
            return Ok(Some(Value::Array(items)));
        };

        let any_dirty = list
            .elements
            .iter()
            .any(|e| e.as_tracked().is_some_and(|o| o.is_dirty()));
        if !(changed || any_dirty) {
            return Ok(None);
        }

        // every element needs its key before anything about the list is emitted
        let keys = list
            .elements
            .iter()
            .enumerate()
            .map(|(index, e)| merge_key_value(schema, field, key, index, e))
            .collect::<Result<Vec<_>>>()?;

        // a reassigned key no longer names the element the server has
        let rekeyed = list
            .elements
            .iter()
            .filter_map(Element::as_tracked)
            .any(|o| o.modifications().contains(key));

        if changed || rekeyed {
            if list.elements.is_empty() {
                if field.required {
                    return Ok(Some(json!([{ PATCH_DIRECTIVE: "replace" }])));
                }
                return Ok(Some(Value::Null));
            }
            let mut items = list.elements.iter().map(Element::to_value).collect::<Result<Vec<_>>>()?;
            items.push(json!({ PATCH_DIRECTIVE: "replace" }));
            tracing::debug!(field = field.wire_name, len = list.elements.len(), "replacing keyed list");
            return Ok(Some(Value::Array(items)));
        }

        let mut items = Vec::new();
        for (element, key_value) in list.elements.iter().zip(keys) {
            let Some(child) = element.as_tracked().filter(|o| o.is_dirty()) else {
                continue;
            };
            let mut partial = self.object_patch(child)?;
            partial.insert(key.to_string(), key_value);
            items.push(self.with_retain_keys_of(field, Value::Object(partial), child)?);
        }
        tracing::debug!(field = field.wire_name, elements = items.len(), "merging keyed list");
        Ok(Some(Value::Array(items)))
    }

    fn map_patch(&self, field: &'static FieldSchema, assigned: bool, map: MapRef<'_>) -> Result<Option<Value>> {
        let mut patch = Map::new();
        for key in map.changes.removed() {
            patch.insert(key.to_string(), Value::Null);
        }
        for (key, element) in &map.entries {
            if assigned || map.changes.is_touched(key) {
                patch.insert(key.to_string(), element.to_value()?);
            } else if let Some(child) = element.as_tracked().filter(|o| o.is_dirty()) {
                patch.insert(key.to_string(), Value::Object(self.object_patch(child)?));
            }
        }
        if patch.is_empty() {
            // assigned an empty map over unknown server state
            return Ok(assigned.then(|| cleared(field)));
        }
        Ok(Some(Value::Object(patch)))
    }

    fn replacing(&self, mut value: Value) -> Value {
        if self.is_strategic() {
            if let Value::Object(map) = &mut value {
                map.insert(PATCH_DIRECTIVE.into(), Value::String("replace".into()));
            }
        }
        value
    }

    fn with_retain_keys_of(&self, field: &FieldSchema, mut partial: Value, child: &dyn Tracked) -> Result<Value> {
        if self.is_strategic() && self.retain_keys && field.strategy.retain_keys {
            if let (Value::Object(map), Value::Object(full)) = (&mut partial, child.to_value()?) {
                map.insert(RETAIN_KEYS_DIRECTIVE.into(), present_keys(&full));
            }
        }
        Ok(partial)
    }
}

/// The value written for a collection that was emptied
fn cleared(field: &FieldSchema) -> Value {
    match (field.required, field.shape) {
        (true, crate::schema::FieldShape::Map) => Value::Object(Map::new()),
        (true, _) => Value::Array(vec![]),
        (false, _) => Value::Null,
    }
}

fn present_keys(map: &Map<String, Value>) -> Value {
    let mut keys: Vec<&String> = map
        .iter()
        .filter(|(k, v)| !v.is_null() && !k.starts_with('$'))
        .map(|(k, _)| k)
        .collect();
    keys.sort();
    Value::Array(keys.into_iter().map(|k| Value::String(k.clone())).collect())
}

fn merge_key_value(
    schema: &'static TypeSchema,
    field: &'static FieldSchema,
    key: &'static str,
    index: usize,
    element: &Element<'_>,
) -> Result<Value> {
    let value = match element {
        Element::Object(o) => o.get(key)?,
        Element::Value(v) => v.get(key).cloned().unwrap_or(Value::Null),
    };
    let missing = match &value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if missing {
        tracing::debug!(type_name = schema.name, field = field.wire_name, index, "element without merge key");
        return Err(MissingMergeKeyError {
            type_name: schema.name,
            field: field.wire_name,
            merge_key: key,
            index,
        }
        .into());
    }
    Ok(value)
}
