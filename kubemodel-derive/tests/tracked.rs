//! Code generated by `#[derive(Tracked)]`
use assert_json_diff::assert_json_eq;
use kubemodel::{
    core::{
        schema::{FieldShape, PatchStrategy},
        ModificationSet, ObjectMeta, PatchBuilder, TrackedList, TrackedMap,
    },
    Resource, ResourceExt, Tracked,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A namespaced custom resource
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(kind = "Sandbox", group = "labs.example.dev", version = "v1beta1", namespaced)]
#[serde(rename_all = "camelCase", default)]
pub struct Sandbox {
    api_version: String,
    kind: String,
    #[tracked(object)]
    metadata: ObjectMeta,
    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<SandboxSpec>,
    #[serde(skip)]
    modifications: ModificationSet,
}

/// Spec with every field shape
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(list_item(kind = "Port", version = "v1"))]
#[serde(rename_all = "camelCase", default)]
pub struct SandboxSpec {
    #[serde(rename = "imageID", skip_serializing_if = "Option::is_none")]
    image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_count: Option<u32>,
    #[tracked(object, merge_key = "port", required)]
    ports: TrackedList<Port>,
    #[tracked(merge)]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    tags: TrackedList<String>,
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    env: TrackedMap<String>,
    #[tracked(object, retain_keys)]
    #[serde(skip_serializing_if = "Option::is_none")]
    storage: Option<Storage>,
    #[serde(skip)]
    modifications: ModificationSet,
}

/// A port keyed by number
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Port {
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,
    #[serde(skip)]
    modifications: ModificationSet,
}

/// Storage replaced by `retainKeys`
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Storage {
    #[serde(skip_serializing_if = "Option::is_none")]
    memory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_path: Option<String>,
    #[serde(skip)]
    modifications: ModificationSet,
}

#[test]
fn resource_impl_from_struct_attributes() {
    assert_eq!(Sandbox::KIND, "Sandbox");
    assert_eq!(Sandbox::GROUP, "labs.example.dev");
    assert_eq!(Sandbox::API_VERSION, "labs.example.dev/v1beta1");
    assert_eq!(Sandbox::PLURAL, "sandboxes");
    assert!(Sandbox::NAMESPACED);
    assert_eq!(
        Sandbox::url_path(Some("dev")),
        "/apis/labs.example.dev/v1beta1/namespaces/dev/sandboxes"
    );

    let sb = Sandbox::default().with_metadata(ObjectMeta::default().with_name("one"));
    assert_eq!(sb.api_version(), "labs.example.dev/v1beta1");
    assert_eq!(sb.kind(), "Sandbox");
    assert_eq!(sb.name_any(), "one");
    assert_eq!(sb.modified_fields().collect::<Vec<_>>(), vec!["metadata"]);
}

#[test]
fn schema_records_field_metadata() {
    let schema = SandboxSpec::type_schema();
    assert_eq!(schema.name, "SandboxSpec");
    assert_eq!(
        schema.wire_names().collect::<Vec<_>>(),
        vec!["imageID", "cpuCount", "ports", "tags", "env", "storage"]
    );

    let ports = schema.field("ports").unwrap();
    assert_eq!(ports.shape, FieldShape::List);
    assert_eq!(ports.merge_key, Some("port"));
    assert_eq!(ports.strategy, PatchStrategy::MERGE);
    assert!(ports.required && ports.tracked);
    assert_eq!(ports.item_schema().unwrap().name, "Port");

    let tags = schema.field("tags").unwrap();
    assert!(tags.is_primitive_merge_list());
    assert_eq!(schema.field("env").unwrap().shape, FieldShape::Map);
    assert_eq!(schema.field("storage").unwrap().strategy, PatchStrategy::RETAIN_KEYS);
    assert_eq!(schema.field("image_id").unwrap().wire_name, "imageID");
    assert_eq!(schema.list_item.unwrap().kind, "Port");
    assert!(Port::type_schema().resource.is_none());
    assert!(Sandbox::type_schema().resource.is_some());
}

#[test]
fn generated_accessors() {
    let mut spec = SandboxSpec::default()
        .with_image_id("sha256:abc")
        .with_cpu_count(2u32)
        .with_tags(["gpu"]);
    assert_eq!(spec.image_id(), Some("sha256:abc"));
    assert_eq!(spec.cpu_count(), Some(2));
    assert_eq!(spec.tags().len(), 1);

    spec.clear_cpu_count();
    assert_eq!(spec.cpu_count(), None);
    spec.set_env([("LANG", "C")]);
    spec.ports_mut().push(Port::default().with_port(8080));
    spec.storage_mut().set_memory(true);

    assert_eq!(
        spec.modified_fields().collect::<Vec<_>>(),
        vec!["imageID", "cpuCount", "ports", "tags", "env", "storage"]
    );
    // the push is recorded by the list, the owner's set only holds assignments
    assert!(spec.ports().is_changed());
    assert!(!spec.modifications().contains("ports"));
    assert_eq!(spec.get("imageID").unwrap(), json!("sha256:abc"));
}

#[test]
fn equality_ignores_modifications() {
    let clean: Port = serde_json::from_value(json!({"port": 80})).unwrap();
    let mut touched = clean.clone();
    touched.set_port(80);
    assert_eq!(clean, touched);
    assert!(touched.is_dirty() && !clean.is_dirty());
}

#[test]
fn required_list_and_retain_keys_in_patches() {
    let mut sb: Sandbox = serde_json::from_value(json!({
        "metadata": {"name": "one"},
        "spec": {"ports": [{"port": 80}], "storage": {"memory": true}},
    }))
    .unwrap();
    let spec = sb.spec_mut();
    spec.ports_mut().clear();
    spec.storage_mut().clear_memory();
    spec.storage_mut().set_disk_path("/var/sandbox");

    let patch = PatchBuilder::strategic().build_value(&sb).unwrap();
    assert_json_eq!(
        patch,
        json!({"spec": {
            "ports": [{"$patch": "replace"}],
            "storage": {"memory": null, "diskPath": "/var/sandbox", "$retainKeys": ["diskPath"]},
        }})
    );
    let patch = PatchBuilder::merge().build_value(&sb).unwrap();
    assert_json_eq!(
        patch,
        json!({"spec": {"ports": [], "storage": {"memory": null, "diskPath": "/var/sandbox"}}})
    );
}
