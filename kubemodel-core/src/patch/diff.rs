//! Patches computed from two snapshots of an object.
//!
//! These complement [`PatchBuilder`](super::PatchBuilder) when a baseline is available, e.g. the
//! last object read from the api server. Unlike the builder they can express removals from
//! merged lists.
use super::{DELETE_FROM_PRIMITIVE_LIST_PREFIX, PATCH_DIRECTIVE, RETAIN_KEYS_DIRECTIVE};
use crate::{
    error::MissingMergeKeyError,
    schema::{FieldSchema, FieldShape, TypeSchema},
    Result,
};
use serde_json::{json, Map, Value};

/// RFC 7396 merge patch turning `old` into `new`
///
/// Removed keys map to `null`, changed objects are diffed recursively and everything else is
/// replaced as a whole.
pub fn merge(old: &Value, new: &Value) -> Value {
    match (old, new) {
        (Value::Object(o), Value::Object(n)) => {
            let mut patch = Map::new();
            for key in o.keys().filter(|k| !n.contains_key(*k)) {
                patch.insert(key.clone(), Value::Null);
            }
            for (key, value) in n {
                match o.get(key) {
                    Some(prev) if prev == value => {}
                    Some(prev @ Value::Object(_)) if value.is_object() => {
                        patch.insert(key.clone(), merge(prev, value));
                    }
                    _ => {
                        patch.insert(key.clone(), value.clone());
                    }
                }
            }
            Value::Object(patch)
        }
        _ => new.clone(),
    }
}

/// RFC 6902 json patch turning `old` into `new`
pub fn json(old: &Value, new: &Value) -> json_patch::Patch {
    json_patch::diff(old, new)
}

/// Strategic merge patch turning `old` into `new`, both instances of `schema`
///
/// Merge-keyed lists are matched by key: changed elements carry their key plus the changed fields
/// and removed elements become `{"<key>": .., "$patch": "delete"}`. Merge-strategy primitive lists
/// emit added values and a `$deleteFromPrimitiveList/<field>` directive for removed ones.
/// Element order is not part of the patch.
#[tracing::instrument(skip_all, fields(type_name = schema.name))]
pub fn strategic(old: &Value, new: &Value, schema: &'static TypeSchema) -> Result<Value> {
    match (old, new) {
        (Value::Object(o), Value::Object(n)) => Ok(Value::Object(object(o, n, Some(schema), false)?)),
        _ => Ok(new.clone()),
    }
}

fn object(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    schema: Option<&'static TypeSchema>,
    retain_keys: bool,
) -> Result<Map<String, Value>> {
    let mut patch = Map::new();
    for key in old.keys().filter(|k| !new.contains_key(*k)) {
        patch.insert(key.clone(), Value::Null);
    }
    for (key, value) in new {
        let prev = old.get(key);
        if prev == Some(value) {
            continue;
        }
        let field = schema.and_then(|s| s.field(key));
        match (prev, value, field) {
            (Some(Value::Object(o)), Value::Object(n), Some(f)) if f.shape == FieldShape::Map => {
                let entries = map(o, n, f.item_schema())?;
                patch.insert(key.clone(), Value::Object(entries));
            }
            (Some(Value::Object(o)), Value::Object(n), f) => {
                let child = f.and_then(FieldSchema::item_schema);
                let retain = f.is_some_and(|f| f.strategy.retain_keys);
                patch.insert(key.clone(), Value::Object(object(o, n, child, retain)?));
            }
            (Some(Value::Array(o)), Value::Array(n), Some(f)) if f.is_keyed_list() => {
                // keyed lists always have a schema, the key comes from it
                let owner = schema.map_or("", |s| s.name);
                let items = keyed_list(owner, f, o, n)?;
                if !items.is_empty() {
                    patch.insert(key.clone(), Value::Array(items));
                }
            }
            (Some(Value::Array(o)), Value::Array(n), Some(f)) if f.is_primitive_merge_list() => {
                let added: Vec<Value> = n.iter().filter(|v| !o.contains(v)).cloned().collect();
                let removed: Vec<Value> = o.iter().filter(|v| !n.contains(v)).cloned().collect();
                if !added.is_empty() {
                    patch.insert(key.clone(), Value::Array(added));
                }
                if !removed.is_empty() {
                    patch.insert(
                        format!("{DELETE_FROM_PRIMITIVE_LIST_PREFIX}{key}"),
                        Value::Array(removed),
                    );
                }
            }
            _ => {
                patch.insert(key.clone(), value.clone());
            }
        }
    }
    if retain_keys && !patch.is_empty() {
        let mut keys: Vec<&String> = new.iter().filter(|(_, v)| !v.is_null()).map(|(k, _)| k).collect();
        keys.sort();
        patch.insert(
            RETAIN_KEYS_DIRECTIVE.into(),
            Value::Array(keys.into_iter().map(|k| Value::String(k.clone())).collect()),
        );
    }
    Ok(patch)
}

fn map(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    item: Option<&'static TypeSchema>,
) -> Result<Map<String, Value>> {
    let mut patch = Map::new();
    for key in old.keys().filter(|k| !new.contains_key(*k)) {
        patch.insert(key.clone(), Value::Null);
    }
    for (key, value) in new {
        match (old.get(key), value) {
            (Some(prev), _) if prev == value => {}
            (Some(Value::Object(o)), Value::Object(n)) if item.is_some() => {
                patch.insert(key.clone(), Value::Object(object(o, n, item, false)?));
            }
            _ => {
                patch.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(patch)
}

fn keyed_list(owner: &'static str, field: &'static FieldSchema, old: &[Value], new: &[Value]) -> Result<Vec<Value>> {
    let Some(key) = field.merge_key else {
        return Ok(new.to_vec());
    };
    let item = field.item_schema();
    let retain = field.strategy.retain_keys;

    let mut items = Vec::new();
    let mut new_keys = Vec::with_capacity(new.len());
    for (index, element) in new.iter().enumerate() {
        let Some(id) = element.get(key).filter(|v| !is_blank(v)) else {
            return Err(MissingMergeKeyError {
                type_name: owner,
                field: field.wire_name,
                merge_key: key,
                index,
            }
            .into());
        };
        new_keys.push(id);
        match old.iter().find(|e| e.get(key) == Some(id)) {
            Some(prev) if prev == element => {}
            Some(Value::Object(prev)) => {
                if let Value::Object(next) = element {
                    let mut partial = object(prev, next, item, retain)?;
                    partial.insert(key.to_string(), id.clone());
                    items.push(Value::Object(partial));
                }
            }
            _ => items.push(element.clone()),
        }
    }
    for prev in old {
        let Some(id) = prev.get(key).filter(|v| !is_blank(v)) else {
            continue;
        };
        if !new_keys.contains(&id) {
            items.push(json!({ key: id, PATCH_DIRECTIVE: "delete" }));
        }
    }
    tracing::trace!(field = field.wire_name, elements = items.len(), "diffed keyed list");
    Ok(items)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
