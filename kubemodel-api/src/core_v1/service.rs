use kubemodel_core::{metadata::ObjectMeta, IntOrString, ModificationSet, TrackedList, TrackedMap};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};

/// A named abstraction of a software service, exposed on local ports and selected pods.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"), kind = "Service", version = "v1", namespaced)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    api_version: String,
    kind: String,

    #[tracked(object)]
    metadata: ObjectMeta,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<ServiceSpec>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Attributes of a service.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceSpec {
    /// Ports exposed by the service
    #[tracked(object, merge_key = "port")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    ports: TrackedList<ServicePort>,

    /// Traffic is routed to pods with labels matching this selector
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    selector: TrackedMap<String>,

    #[serde(rename = "clusterIP", skip_serializing_if = "Option::is_none")]
    cluster_ip: Option<String>,

    /// `ClusterIP`, `NodePort`, `LoadBalancer` or `ExternalName`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    session_affinity: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A port exposed by a service.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct ServicePort {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Port exposed by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<i32>,

    /// Number or name of the port on the selected pods
    #[serde(skip_serializing_if = "Option::is_none")]
    target_port: Option<IntOrString>,

    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    node_port: Option<i32>,

    #[serde(skip)]
    modifications: ModificationSet,
}
