use kubemodel_core::{metadata::ObjectMeta, ModificationSet, TrackedMap};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};

/// Configuration data for pods to consume.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"), kind = "ConfigMap", version = "v1", namespaced)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigMap {
    api_version: String,
    kind: String,

    #[tracked(object)]
    metadata: ObjectMeta,

    /// UTF-8 configuration data
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    data: TrackedMap<String>,

    /// Base64 encoded binary data
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    binary_data: TrackedMap<String>,

    /// Whether the data can no longer be updated
    #[serde(skip_serializing_if = "Option::is_none")]
    immutable: Option<bool>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Secret data, such as passwords or tokens.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"), kind = "Secret", version = "v1", namespaced)]
#[serde(rename_all = "camelCase", default)]
pub struct Secret {
    api_version: String,
    kind: String,

    #[tracked(object)]
    metadata: ObjectMeta,

    /// Base64 encoded secret values
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    data: TrackedMap<String>,

    /// Plain text values, merged into `data` by the server on write
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    string_data: TrackedMap<String>,

    /// Type used to validate the content, e.g. `kubernetes.io/tls`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    immutable: Option<bool>,

    #[serde(skip)]
    modifications: ModificationSet,
}
