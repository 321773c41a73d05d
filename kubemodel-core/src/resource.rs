use crate::{
    gvk::GroupVersionKind,
    metadata::{ObjectMeta, OwnerReference},
    schema::ResourceKind,
    TrackedList, TrackedMap,
};
use std::collections::BTreeMap;

/// An accessor trait for a kubernetes Resource.
///
/// This is for a subset of Kubernetes type that do not end in `List`.
/// These types, using [`ObjectMeta`], SHOULD all have required properties:
/// - `.metadata`
/// - `.metadata.name`
///
/// And these optional properties:
/// - `.metadata.namespace`
/// - `.metadata.resource_version`
///
/// Implemented by `#[derive(Tracked)]` for types declaring a `kind`.
pub trait Resource {
    /// The kind of the resource
    const KIND: &'static str;
    /// The API group, empty for the core group
    const GROUP: &'static str;
    /// The version within the group
    const VERSION: &'static str;
    /// The `apiVersion` string, `<group>/<version>` or just `<version>` for the core group
    const API_VERSION: &'static str;
    /// The plural name of the kind
    ///
    /// This is known as the resource in apimachinery, we rename it for disambiguation.
    const PLURAL: &'static str;
    /// Whether the resource lives in a namespace
    const NAMESPACED: bool;

    /// Group, version and kind of the resource
    fn gvk() -> GroupVersionKind {
        GroupVersionKind::gvk(Self::GROUP, Self::VERSION, Self::KIND)
    }

    /// Static identity of the resource, as recorded in its schema
    fn resource_kind() -> ResourceKind {
        ResourceKind {
            group: Self::GROUP,
            version: Self::VERSION,
            kind: Self::KIND,
            plural: Self::PLURAL,
            namespaced: Self::NAMESPACED,
        }
    }

    /// Creates a url path for http requests for this resource
    ///
    /// The namespace is ignored for cluster scoped resources.
    fn url_path(namespace: Option<&str>) -> String {
        let n = match namespace {
            Some(ns) if Self::NAMESPACED => format!("namespaces/{ns}/"),
            _ => "".into(),
        };
        format!(
            "/{group}/{api_version}/{namespaces}{plural}",
            group = if Self::GROUP.is_empty() { "api" } else { "apis" },
            api_version = Self::API_VERSION,
            namespaces = n,
            plural = Self::PLURAL
        )
    }

    /// Metadata that all persisted resources must have
    fn meta(&self) -> &ObjectMeta;
    /// Metadata that all persisted resources must have
    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// Generates a controller owner reference pointing to this resource
    ///
    /// Note: this returns an `Option`, but for objects populated from the apiserver,
    /// this Option can be safely unwrapped.
    fn controller_owner_ref(&self) -> Option<OwnerReference> {
        let meta = self.meta();
        Some(
            OwnerReference::default()
                .with_api_version(Self::API_VERSION)
                .with_kind(Self::KIND)
                .with_name(meta.name()?)
                .with_uid(meta.uid()?)
                .with_controller(true),
        )
    }
}

/// Helper methods for resources.
///
/// The `_mut` accessors hand out tracked collections, so edits made through them show up in
/// the next generated patch.
pub trait ResourceExt: Resource {
    /// Returns the name of the resource, panicking if it is unset
    ///
    /// Only use this function if you know that name is set; for example when
    /// the resource was received from the apiserver (post-admission),
    /// or if you constructed the resource with the name.
    ///
    /// At admission, `.metadata.generateName` can be set instead of name
    /// and in those cases this function can panic.
    ///
    /// Prefer using `.meta().name()` or [`name_any`](ResourceExt::name_any)
    /// for the more general cases.
    fn name_unchecked(&self) -> String;

    /// Returns the most useful name identifier available
    ///
    /// This is tries `name`, then `generateName`, and falls back on an empty string when neither is set.
    /// Generally you always have one of the two unless you are creating the object locally.
    fn name_any(&self) -> String;

    /// The namespace the resource is in
    fn namespace(&self) -> Option<String>;
    /// The resource version
    fn resource_version(&self) -> Option<String>;
    /// Unique ID (if you delete resource and then create a new
    /// resource with the same name, it will have different ID)
    fn uid(&self) -> Option<String>;
    /// Returns resource labels
    fn labels(&self) -> &BTreeMap<String, String>;
    /// Provides mutable access to the labels
    fn labels_mut(&mut self) -> &mut TrackedMap<String>;
    /// Returns resource annotations
    fn annotations(&self) -> &BTreeMap<String, String>;
    /// Provider mutable access to the annotations
    fn annotations_mut(&mut self) -> &mut TrackedMap<String>;
    /// Returns resource owner references
    fn owner_references(&self) -> &[OwnerReference];
    /// Provides mutable access to the owner references
    fn owner_references_mut(&mut self) -> &mut TrackedList<OwnerReference>;
    /// Returns resource finalizers
    fn finalizers(&self) -> &[String];
    /// Provides mutable access to the finalizers
    fn finalizers_mut(&mut self) -> &mut TrackedList<String>;
}

impl<K: Resource> ResourceExt for K {
    fn name_unchecked(&self) -> String {
        self.meta().name().expect(".metadata.name missing").to_string()
    }

    fn name_any(&self) -> String {
        self.meta()
            .name()
            .or_else(|| self.meta().generate_name())
            .unwrap_or_default()
            .to_string()
    }

    fn namespace(&self) -> Option<String> {
        self.meta().namespace().map(String::from)
    }

    fn resource_version(&self) -> Option<String> {
        self.meta().resource_version().map(String::from)
    }

    fn uid(&self) -> Option<String> {
        self.meta().uid().map(String::from)
    }

    fn labels(&self) -> &BTreeMap<String, String> {
        self.meta().labels()
    }

    fn labels_mut(&mut self) -> &mut TrackedMap<String> {
        self.meta_mut().labels_mut()
    }

    fn annotations(&self) -> &BTreeMap<String, String> {
        self.meta().annotations()
    }

    fn annotations_mut(&mut self) -> &mut TrackedMap<String> {
        self.meta_mut().annotations_mut()
    }

    fn owner_references(&self) -> &[OwnerReference] {
        self.meta().owner_references()
    }

    fn owner_references_mut(&mut self) -> &mut TrackedList<OwnerReference> {
        self.meta_mut().owner_references_mut()
    }

    fn finalizers(&self) -> &[String] {
        self.meta().finalizers()
    }

    fn finalizers_mut(&mut self) -> &mut TrackedList<String> {
        self.meta_mut().finalizers_mut()
    }
}
