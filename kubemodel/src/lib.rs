//! Kubemodel is an umbrella-crate for change tracked [Kubernetes](http://kubernetes.io) models in Rust.
//!
//! # Overview
//!
//! Every model remembers which of its fields were assigned since it was read, and carries the
//! merge metadata of the Kubernetes OpenAPI schema for its fields. A [`PatchBuilder`](crate::core::PatchBuilder)
//! turns those modifications into the smallest JSON merge patch or strategic merge patch that
//! reproduces them on the server.
//!
//! The main modules are:
//!
//! - [`core`](crate::core) with the tracking primitives, schemas, patch builder and request building
//! - [`api`](crate::api) with the tracked models for core/v1, apps/v1, meta/v1 and apiextensions/v1
//! - [`derive`](kubemodel_derive) with the [`Tracked`](macro@crate::Tracked) derive for your own types
//!
//! # Patching a Deployment
//!
//! ```rust
//! use kubemodel::{api::apps_v1::Deployment, core::{PatchBuilder, PatchParams, Request}, Resource};
//! use serde_json::json;
//!
//! let mut deploy: Deployment = serde_json::from_value(json!({
//!     "apiVersion": "apps/v1",
//!     "kind": "Deployment",
//!     "metadata": {"name": "web", "namespace": "prod"},
//!     "spec": {
//!         "replicas": 2,
//!         "template": {"spec": {"containers": [{"name": "app", "image": "nginx:1.27"}]}},
//!     },
//! }))?;
//!
//! deploy.spec_mut().set_replicas(3);
//!
//! let req = Request::for_resource::<Deployment>(Some("prod"));
//! let http = req.patch_tracked("web", &PatchParams::default(), &PatchBuilder::strategic(), &deploy)?;
//! assert_eq!(http.uri(), "/apis/apps/v1/namespaces/prod/deployments/web?");
//! assert_eq!(http.body(), br#"{"spec":{"replicas":3}}"#);
//! # Ok::<(), kubemodel::core::Error>(())
//! ```
//!
//! # Tracking your own types
//!
//! ```rust
//! use kubemodel::{core::{ModificationSet, ObjectMeta, PatchBuilder, TrackedMap}, Tracked};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
//! #[tracked(kind = "Gauge", group = "metrics.example.dev", version = "v1alpha1", namespaced)]
//! #[serde(rename_all = "camelCase", default)]
//! pub struct Gauge {
//!     api_version: String,
//!     kind: String,
//!     #[tracked(object)]
//!     metadata: ObjectMeta,
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     threshold: Option<f64>,
//!     #[serde(skip_serializing_if = "TrackedMap::is_empty")]
//!     thresholds_by_zone: TrackedMap<f64>,
//!     #[serde(skip)]
//!     modifications: ModificationSet,
//! }
//!
//! let mut gauge = Gauge::default();
//! gauge.thresholds_by_zone_mut().insert("eu-west-1", 0.8);
//! let patch = PatchBuilder::merge().include_type_meta(true).build_value(&gauge)?;
//! assert_eq!(patch, json!({
//!     "apiVersion": "metrics.example.dev/v1alpha1",
//!     "kind": "Gauge",
//!     "thresholdsByZone": {"eu-west-1": 0.8},
//! }));
//! # Ok::<(), kubemodel::core::Error>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

macro_rules! cfg_api {
    ($($item:item)*) => {
        $(
            #[cfg_attr(docsrs, doc(cfg(feature = "api")))]
            #[cfg(feature = "api")]
            $item
        )*
    }
}

cfg_api! {
    pub use kubemodel_api as api;
    #[doc(inline)]
    pub use api::registry;
}

/// Re-exports from [`kubemodel-derive`](kubemodel_derive)
#[cfg(feature = "derive")]
#[cfg_attr(docsrs, doc(cfg(feature = "derive")))]
pub use kubemodel_derive::Tracked;

pub use crate::core::{Resource, ResourceExt, Tracked};
/// Re-exports from [`kubemodel_core`](kubemodel_core)
#[doc(inline)]
pub use kubemodel_core as core;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = core::Error> = std::result::Result<T, E>;
