//! core/v1 models
mod config;
mod container;
mod pod;
mod service;
mod volume;

pub use config::{ConfigMap, Secret};
pub use container::{
    Container, ContainerPort, EnvVar, HTTPGetAction, Probe, ResourceRequirements, SecurityContext, VolumeMount,
};
pub use pod::{
    HostAlias, LocalObjectReference, Pod, PodCondition, PodSpec, PodStatus, PodTemplateSpec, Toleration,
};
pub use service::{Service, ServicePort, ServiceSpec};
pub use volume::{
    AWSElasticBlockStoreVolumeSource, ConfigMapVolumeSource, EmptyDirVolumeSource, HostPathVolumeSource,
    KeyToPath, PersistentVolumeClaimVolumeSource, SecretVolumeSource, Volume,
};
