//! Crate with the change tracking core of kubemodel
//!
//! Model types record which of their fields were assigned since they were constructed or
//! deserialized. From that record, and from the merge metadata every type carries, this crate
//! computes JSON merge patches and strategic merge patches that send only what changed.
//!
//! The same information here is always re-exported from `kubemodel` under `kubemodel::core`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod codec;

mod collections;
pub use collections::{MapChanges, TrackedList, TrackedMap};

pub mod gvk;
pub use gvk::{GroupVersion, GroupVersionKind};

pub mod intstr;
pub use intstr::IntOrString;

pub mod metadata;
pub use metadata::ObjectMeta;

pub mod object;
pub use object::ObjectList;

pub mod patch;
pub use patch::{Patch, PatchBuilder, PatchKind, PatchParams};

pub mod request;
pub use request::Request;

mod resource;
pub use resource::{Resource, ResourceExt};

pub mod schema;
pub use schema::{SchemaRegistry, TypeSchema};

pub mod tracking;
pub use tracking::{ModificationSet, Tracked};

mod error;
pub use error::{Error, MissingMergeKeyError, SchemaMismatchError};

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
