//! Change tracked models for a subset of the Kubernetes API
//!
//! Every model records which fields were assigned through its setters, and carries the merge
//! metadata (`x-kubernetes-patch-merge-key`, `x-kubernetes-patch-strategy`) of its fields, so that
//! [`PatchBuilder`](kubemodel_core::PatchBuilder) can send only what changed.
//!
//! ```rust
//! use kubemodel_api::core_v1::{Container, Pod, VolumeMount};
//! use kubemodel_core::{PatchBuilder, Tracked};
//! use serde_json::json;
//!
//! let mut pod: Pod = serde_json::from_value(json!({
//!     "metadata": {"name": "web"},
//!     "spec": {"containers": [{
//!         "name": "app",
//!         "image": "nginx:1.27",
//!         "volumeMounts": [{"name": "data", "mountPath": "/data"}],
//!     }]},
//! }))?;
//! assert!(!pod.is_dirty());
//!
//! let app = pod.spec_mut().containers_mut().find_mut(|c| c.name() == "app").unwrap();
//! app.set_image("nginx:1.28");
//!
//! let patch = PatchBuilder::strategic().build_value(&pod)?;
//! assert_eq!(patch, json!({"spec": {"containers": [{"name": "app", "image": "nginx:1.28"}]}}));
//! # Ok::<(), kubemodel_core::Error>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod apiextensions_v1;
pub mod apps_v1;
pub mod core_v1;
pub mod meta_v1;

use kubemodel_core::SchemaRegistry;
use std::sync::LazyLock;

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    let registry = SchemaRegistry::from_roots([
        core_v1::Pod::type_schema(),
        core_v1::Service::type_schema(),
        core_v1::ConfigMap::type_schema(),
        core_v1::Secret::type_schema(),
        apps_v1::Deployment::type_schema(),
        apiextensions_v1::JSONSchemaProps::type_schema(),
    ]);
    tracing::debug!(types = registry.len(), "built schema registry");
    registry
});

/// The schemas of every model in this crate, looked up by type name or by `apiVersion`/`kind`
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}
