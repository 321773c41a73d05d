//! Local application of patch documents.
//!
//! Mirrors what the api server does with a patch body, which makes it possible to preview the
//! effect of a patch, or to check that a generated patch turns one snapshot into another.
use super::{DELETE_FROM_PRIMITIVE_LIST_PREFIX, PATCH_DIRECTIVE, RETAIN_KEYS_DIRECTIVE};
use crate::{
    schema::{FieldShape, TypeSchema},
    Result,
};
use serde_json::{Map, Value};

/// Apply an RFC 7396 merge patch
pub fn merge(target: &mut Value, patch: &Value) {
    json_patch::merge(target, patch)
}

/// Apply an RFC 6902 json patch
pub fn json(target: &mut Value, patch: &json_patch::Patch) -> Result<()> {
    json_patch::patch(target, patch).map_err(|e| crate::Error::Validation(e.to_string()))
}

/// Apply a strategic merge patch to an instance of `schema`
///
/// Honors `$patch: replace` and `$patch: delete` in merge-keyed lists, `$retainKeys` and
/// `$deleteFromPrimitiveList/<field>`.
pub fn strategic(target: &mut Value, patch: &Value, schema: &'static TypeSchema) -> Result<()> {
    match patch {
        Value::Object(patch) => object(target, patch, Some(schema)),
        other => {
            *target = other.clone();
            Ok(())
        }
    }
}

fn object(target: &mut Value, patch: &Map<String, Value>, schema: Option<&'static TypeSchema>) -> Result<()> {
    if patch.get(PATCH_DIRECTIVE).and_then(Value::as_str) == Some("replace") {
        *target = Value::Object(strip_directives(patch));
        return Ok(());
    }
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(current) = target else {
        return Ok(());
    };

    if let Some(Value::Array(keep)) = patch.get(RETAIN_KEYS_DIRECTIVE) {
        let stale: Vec<String> = current
            .keys()
            .filter(|k| !keep.iter().any(|v| v.as_str() == Some(k.as_str())))
            .cloned()
            .collect();
        for key in stale {
            current.remove(&key);
        }
    }

    for (key, value) in patch {
        if key.starts_with('$') && !key.starts_with(DELETE_FROM_PRIMITIVE_LIST_PREFIX) {
            continue;
        }
        if let Some(list) = key.strip_prefix(DELETE_FROM_PRIMITIVE_LIST_PREFIX) {
            if let (Some(Value::Array(items)), Value::Array(removed)) = (current.get_mut(list), value) {
                items.retain(|v| !removed.contains(v));
            }
            continue;
        }
        if value.is_null() {
            current.remove(key);
            continue;
        }
        let field = schema.and_then(|s| s.field(key));
        let slot = current.entry(key.clone()).or_insert(Value::Null);
        match (value, field) {
            (Value::Object(p), Some(f)) if f.shape == FieldShape::Map => map(slot, p, f.item_schema())?,
            (Value::Object(p), f) => object(slot, p, f.and_then(|f| f.item_schema()))?,
            (Value::Array(items), Some(f)) if f.is_keyed_list() => {
                if let Some(key) = f.merge_key {
                    keyed_list(slot, items, key, f.item_schema())?;
                }
            }
            (Value::Array(items), Some(f)) if f.is_primitive_merge_list() => {
                if let Value::Array(existing) = slot {
                    for item in items {
                        if !existing.contains(item) {
                            existing.push(item.clone());
                        }
                    }
                } else {
                    *slot = value.clone();
                }
            }
            _ => *slot = value.clone(),
        }
    }
    Ok(())
}

fn map(target: &mut Value, patch: &Map<String, Value>, item: Option<&'static TypeSchema>) -> Result<()> {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(current) = target else {
        return Ok(());
    };
    for (key, value) in patch {
        match value {
            Value::Null => {
                current.remove(key);
            }
            Value::Object(p) if item.is_some() => {
                let slot = current.entry(key.clone()).or_insert(Value::Null);
                object(slot, p, item)?;
            }
            _ => {
                current.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(())
}

fn keyed_list(target: &mut Value, items: &[Value], key: &str, item: Option<&'static TypeSchema>) -> Result<()> {
    let replace = items
        .iter()
        .any(|i| i.get(PATCH_DIRECTIVE).and_then(Value::as_str) == Some("replace"));
    if replace || !target.is_array() {
        let kept = items
            .iter()
            .filter(|i| i.get(PATCH_DIRECTIVE).is_none())
            .map(|i| match i {
                Value::Object(m) => Value::Object(strip_directives(m)),
                other => other.clone(),
            })
            .collect();
        *target = Value::Array(kept);
        return Ok(());
    }
    let Value::Array(current) = target else {
        return Ok(());
    };
    for patch_item in items {
        let (Some(id), Value::Object(patch_map)) = (patch_item.get(key), patch_item) else {
            continue;
        };
        if patch_map.get(PATCH_DIRECTIVE).and_then(Value::as_str) == Some("delete") {
            current.retain(|e| e.get(key) != Some(id));
            continue;
        }
        match current.iter_mut().find(|e| e.get(key) == Some(id)) {
            Some(existing) => object(existing, patch_map, item)?,
            None => {
                let mut added = Value::Object(Map::new());
                object(&mut added, patch_map, item)?;
                current.push(added);
            }
        }
    }
    Ok(())
}

fn strip_directives(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| !k.starts_with('$'))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
