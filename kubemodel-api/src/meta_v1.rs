//! meta/v1 models
pub use kubemodel_core::metadata::{ListMeta, ObjectMeta, OwnerReference, TypeMeta};
use kubemodel_core::{ModificationSet, TrackedList, TrackedMap};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};

/// A label query over a set of resources.
///
/// The requirements of `matchLabels` and `matchExpressions` are ANDed.
/// An empty selector matches all objects.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelector {
    /// Requirements on label values
    #[tracked(object, merge_key = "key")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    match_expressions: TrackedList<LabelSelectorRequirement>,

    /// Labels that must all match exactly
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    match_labels: TrackedMap<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

impl LabelSelector {
    /// Whether the selector matches a set of labels
    pub fn matches(&self, labels: &std::collections::BTreeMap<String, String>) -> bool {
        self.match_labels.iter().all(|(k, v)| labels.get(k) == Some(v))
            && self.match_expressions.iter().all(|r| r.matches(labels))
    }
}

/// A selector requirement: a key, an operator and values.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelectorRequirement {
    /// The label key the selector applies to
    key: String,

    /// One of `In`, `NotIn`, `Exists` and `DoesNotExist`
    operator: String,

    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    values: TrackedList<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

impl LabelSelectorRequirement {
    fn matches(&self, labels: &std::collections::BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator.as_str() {
            "In" => value.is_some_and(|v| self.values.contains(v)),
            "NotIn" => !value.is_some_and(|v| self.values.contains(v)),
            "Exists" => value.is_some(),
            "DoesNotExist" => value.is_none(),
            _ => false,
        }
    }
}
