//! A crate for kubemodel's derive macros.
#![recursion_limit = "1024"]
extern crate proc_macro;
#[macro_use] extern crate quote;

mod tracked;

/// A custom derive for change tracked model types.
///
/// The struct must have named fields and exactly one field of type
/// `ModificationSet`, marked `#[serde(skip)]`. The derive then generates:
///
/// - a getter per field, plus `set_<field>`, `with_<field>` and (for `Option` fields) `clear_<field>`;
///   every setter records the field's wire name, even when the new value equals the old one
/// - `<field>_mut` for nested tracked objects and for `TrackedList` / `TrackedMap` fields
/// - `type_schema()`, the static table of wire names and merge metadata
/// - `Default`, `PartialEq` (ignoring the modification set) and `Tracked`
/// - `Resource`, when a `kind` is given
///
/// Fields are not public; the generated accessors are the way to change them.
///
/// # Example
///
/// ```rust
/// use kubemodel::{core::{ModificationSet, TrackedList}, Tracked};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Tracked, Clone, Debug, Serialize, Deserialize)]
/// #[serde(rename_all = "camelCase", default)]
/// pub struct Mount {
///     name: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     mount_path: Option<String>,
///     #[serde(skip)]
///     modifications: ModificationSet,
/// }
///
/// #[derive(Tracked, Clone, Debug, Serialize, Deserialize)]
/// #[serde(rename_all = "camelCase", default)]
/// pub struct Holder {
///     #[tracked(object, merge_key = "name")]
///     #[serde(skip_serializing_if = "TrackedList::is_empty")]
///     mounts: TrackedList<Mount>,
///     #[serde(skip)]
///     modifications: ModificationSet,
/// }
///
/// let mut mount = Mount::default();
/// mount.set_mount_path("/data");
/// assert!(mount.is_modified("mountPath").unwrap());
/// assert!(!mount.is_modified("name").unwrap());
/// assert_eq!(Holder::type_schema().merge_key("mounts"), Some("name"));
/// ```
///
/// ## Struct attributes
///
/// ### `#[tracked(kind = "Pod", version = "v1")]`
/// Implements `Resource` for the type. `group` defaults to the core group, `plural` defaults
/// to the lowercased plural of the kind, and `namespaced` marks the resource as namespaced.
/// Resource types need a `metadata: ObjectMeta` field, and `Default` fills in
/// `apiVersion` and `kind` when the type declares them.
///
/// ### `#[tracked(list_item(kind = "KeyToPath", version = "v1"))]`
/// Records the kind of the items described by the type.
///
/// ### `#[tracked(crates(kubemodel_core = "::kubemodel_core"))]`
/// Path of the core crate in generated code, `::kubemodel::core` by default.
///
/// ## Field attributes
///
/// - `#[tracked(object)]`: the field (or the elements of a list or map) is itself a tracked type
/// - `#[tracked(merge_key = "name")]`: list elements are matched by this key in strategic merge patches
/// - `#[tracked(merge)]`: the list is merged as a set rather than replaced
/// - `#[tracked(retain_keys)]`: the `retainKeys` patch strategy
/// - `#[tracked(required)]`: the collection is sent as empty rather than cleared
///
/// Wire names follow `#[serde(rename = "..")]` and `#[serde(rename_all = "camelCase")]`.
#[proc_macro_derive(Tracked, attributes(tracked))]
pub fn derive_tracked(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    tracked::derive(proc_macro2::TokenStream::from(input)).into()
}
