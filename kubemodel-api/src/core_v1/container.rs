use kubemodel_core::{IntOrString, ModificationSet, TrackedList, TrackedMap};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single application container that runs within a pod.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    /// Name of the container, unique within the pod
    name: String,

    /// Container image name
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,

    /// One of `Always`, `Never` and `IfNotPresent`
    #[serde(skip_serializing_if = "Option::is_none")]
    image_pull_policy: Option<String>,

    /// Entrypoint array, replacing the image's `ENTRYPOINT`
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    command: TrackedList<String>,

    /// Arguments to the entrypoint, replacing the image's `CMD`
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    args: TrackedList<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    working_dir: Option<String>,

    /// Ports exposed by the container
    #[tracked(object, merge_key = "containerPort")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    ports: TrackedList<ContainerPort>,

    /// Environment variables set in the container
    #[tracked(object, merge_key = "name")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    env: TrackedList<EnvVar>,

    /// Volumes mounted into the container's filesystem
    #[tracked(object, merge_key = "mountPath")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    volume_mounts: TrackedList<VolumeMount>,

    /// Compute resources required by the container
    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<ResourceRequirements>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    liveness_probe: Option<Probe>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    readiness_probe: Option<Probe>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    security_context: Option<SecurityContext>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A network port in a single container.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerPort {
    /// Port number on the pod's IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    container_port: Option<i32>,

    /// Name that services can refer to
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// `TCP`, `UDP` or `SCTP`
    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    host_port: Option<i32>,

    #[serde(rename = "hostIP", skip_serializing_if = "Option::is_none")]
    host_ip: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// An environment variable present in a container.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct EnvVar {
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,

    /// Source of the value, kept as sent by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    value_from: Option<Value>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A mounting of a volume within a container.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeMount {
    /// Name of the mounted volume
    name: String,

    /// Path within the container at which the volume is mounted
    mount_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    read_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sub_path: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Compute resource requirements, as quantities such as `500m` or `1Gi`.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceRequirements {
    /// Maximum amount of compute resources allowed
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    limits: TrackedMap<String>,

    /// Minimum amount of compute resources required
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    requests: TrackedMap<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A health check performed against a container.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct Probe {
    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    http_get: Option<HTTPGetAction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    initial_delay_seconds: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    period_seconds: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_seconds: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    failure_threshold: Option<i32>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// An HTTP GET request used by a probe.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct HTTPGetAction {
    /// Port number or name to connect to
    port: IntOrString,

    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,

    /// Host to connect to, the pod IP by default
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,

    /// `HTTP` or `HTTPS`
    #[serde(skip_serializing_if = "Option::is_none")]
    scheme: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Security options of a container.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    run_as_user: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    run_as_non_root: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    privileged: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    read_only_root_filesystem: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    allow_privilege_escalation: Option<bool>,

    #[serde(skip)]
    modifications: ModificationSet,
}
