//! Metadata structs used in traits, lists, and resources.
use crate::{
    collections::{TrackedList, TrackedMap},
    gvk::{GroupVersionKind, ParseGroupVersionError},
    tracking::ModificationSet,
};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};

/// Type information that is flattened into every kubernetes object
#[derive(Deserialize, Serialize, Clone, Default, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// The version of the API
    pub api_version: String,

    /// The name of the API
    pub kind: String,
}

impl TypeMeta {
    /// Type information of a resource type
    pub fn resource<K: crate::Resource>() -> Self {
        Self {
            api_version: K::API_VERSION.into(),
            kind: K::KIND.into(),
        }
    }

    /// Group, version and kind named by this type information
    pub fn gvk(&self) -> Result<GroupVersionKind, ParseGroupVersionError> {
        GroupVersionKind::try_from_api_version(&self.api_version, &self.kind)
    }
}

/// Metadata carried by list responses.
#[derive(Deserialize, Serialize, Clone, Default, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    /// Token for the next chunk of a paginated list
    #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_: Option<String>,

    /// Number of items left after this chunk, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_item_count: Option<i64>,

    /// Version of the list as a whole
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

/// Standard object metadata that all persisted resources have.
///
/// `labels` and `annotations` are patched key by key, `finalizers` are merged as a set and
/// `ownerReferences` are matched by `uid`.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "crate"))]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    /// Name, unique within a namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Prefix used by the server to generate a unique name when `name` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    generate_name: Option<String>,

    /// Namespace of a namespaced resource
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,

    /// Server assigned unique id
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<String>,

    /// Opaque version used for optimistic concurrency
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_version: Option<String>,

    /// Sequence number of the desired state
    #[serde(skip_serializing_if = "Option::is_none")]
    generation: Option<i64>,

    /// RFC 3339 timestamp of creation
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_timestamp: Option<String>,

    /// RFC 3339 timestamp after which the object is removed
    #[serde(skip_serializing_if = "Option::is_none")]
    deletion_timestamp: Option<String>,

    /// Seconds allowed for graceful termination
    #[serde(skip_serializing_if = "Option::is_none")]
    deletion_grace_period_seconds: Option<i64>,

    /// Labels
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    labels: TrackedMap<String>,

    /// Annotations
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    annotations: TrackedMap<String>,

    /// Finalizers that must be removed before the object is deleted
    #[tracked(merge)]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    finalizers: TrackedList<String>,

    /// Objects this object depends on
    #[tracked(object, merge_key = "uid")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    owner_references: TrackedList<OwnerReference>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A reference to an owning object.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "crate"))]
#[serde(rename_all = "camelCase", default)]
pub struct OwnerReference {
    api_version: String,
    kind: String,
    name: String,
    uid: String,

    /// Whether the owner is the managing controller
    #[serde(skip_serializing_if = "Option::is_none")]
    controller: Option<bool>,

    /// Whether the owner can only be deleted once this object is gone
    #[serde(skip_serializing_if = "Option::is_none")]
    block_owner_deletion: Option<bool>,

    #[serde(skip)]
    modifications: ModificationSet,
}
