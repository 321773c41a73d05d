use super::{Container, Volume};
use kubemodel_core::{metadata::ObjectMeta, ModificationSet, TrackedList, TrackedMap};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};

/// A collection of containers that run together on a host.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"), kind = "Pod", version = "v1", namespaced)]
#[serde(rename_all = "camelCase", default)]
pub struct Pod {
    api_version: String,
    kind: String,

    /// Standard object metadata
    #[tracked(object)]
    metadata: ObjectMeta,

    /// Desired behaviour of the pod
    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<PodSpec>,

    /// Most recently observed status, populated by the system
    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<PodStatus>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Specification of a pod.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct PodSpec {
    /// Containers belonging to the pod; there must be at least one
    #[tracked(object, merge_key = "name", required)]
    containers: TrackedList<Container>,

    /// Containers run to completion, in order, before the app containers start
    #[tracked(object, merge_key = "name")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    init_containers: TrackedList<Container>,

    /// Volumes that containers of the pod can mount
    #[tracked(object, merge_key = "name", retain_keys)]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    volumes: TrackedList<Volume>,

    #[tracked(object, merge_key = "key")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    tolerations: TrackedList<Toleration>,

    /// Entries added to the pod's hosts file
    #[tracked(object, merge_key = "ip")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    host_aliases: TrackedList<HostAlias>,

    #[tracked(object, merge_key = "name")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    image_pull_secrets: TrackedList<LocalObjectReference>,

    /// Labels a node must carry for the pod to be scheduled onto it
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    node_selector: TrackedMap<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    node_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    service_account_name: Option<String>,

    /// One of `Always`, `OnFailure` and `Never`
    #[serde(skip_serializing_if = "Option::is_none")]
    restart_policy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    termination_grace_period_seconds: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    host_network: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Most recently observed status of a pod.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct PodStatus {
    /// One of `Pending`, `Running`, `Succeeded`, `Failed` and `Unknown`
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<String>,

    #[tracked(object, merge_key = "type")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    conditions: TrackedList<PodCondition>,

    /// Address of the host the pod is assigned to
    #[serde(rename = "hostIP", skip_serializing_if = "Option::is_none")]
    host_ip: Option<String>,

    /// Address allocated to the pod
    #[serde(rename = "podIP", skip_serializing_if = "Option::is_none")]
    pod_ip: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Current service state of a pod.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct PodCondition {
    /// Type of the condition, e.g. `Ready`
    #[serde(rename = "type")]
    type_: String,

    /// One of `True`, `False` and `Unknown`
    status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    last_probe_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    last_transition_time: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A template from which pods are created.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct PodTemplateSpec {
    /// Metadata given to the created pods
    #[tracked(object)]
    metadata: ObjectMeta,

    /// Specification of the created pods
    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<PodSpec>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Tolerates nodes with a matching taint.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct Toleration {
    /// The taint key the toleration applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,

    /// `Exists` or `Equal`
    #[serde(skip_serializing_if = "Option::is_none")]
    operator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,

    /// Taint effect to match, empty for all effects
    #[serde(skip_serializing_if = "Option::is_none")]
    effect: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    toleration_seconds: Option<i64>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// An entry of the pod's hosts file.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct HostAlias {
    #[serde(skip_serializing_if = "Option::is_none")]
    ip: Option<String>,

    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    hostnames: TrackedList<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A reference to an object in the same namespace.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct LocalObjectReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}
