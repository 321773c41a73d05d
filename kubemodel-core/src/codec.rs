//! JSON and YAML encoding of model types.
//!
//! Objects decoded here start with empty modification sets. Encoding writes the full object,
//! never a patch.
use crate::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Encode a value as compact JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Encode a value as indented JSON
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Decode a value from JSON
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a value as YAML
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// Decode a value from a single YAML document
pub fn from_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Decode every document of a multi-document YAML stream
///
/// Empty documents are skipped.
pub fn from_yaml_documents<T: DeserializeOwned>(yaml: &str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        items.push(serde_yaml::from_value(value)?);
    }
    tracing::trace!(documents = items.len(), "decoded yaml stream");
    Ok(items)
}
