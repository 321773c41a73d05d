//! Schema registry over the bundled models
use kubemodel_api::{apps_v1::Deployment, core_v1::Pod, registry};
use kubemodel_core::{schema::ListItemKind, Resource};

#[test]
fn merge_keys_name_element_fields() {
    registry().validate().unwrap();
}

#[test]
fn resources_are_found_by_kind() {
    let reg = registry();
    let deploy = reg.for_kind("apps/v1", "Deployment").unwrap();
    assert_eq!(deploy.name, "Deployment");
    assert_eq!(deploy.resource.unwrap().plural, Deployment::PLURAL);
    assert_eq!(reg.for_kind("v1", "Pod").unwrap().name, "Pod");
    assert!(reg.for_kind("v1", "Deployment").is_none());
    // nested types are registered by walking the roots
    assert!(reg.get("VolumeMount").is_some());
    assert!(reg.get("LabelSelectorRequirement").is_some());
}

#[test]
fn merge_metadata_lookups() {
    let reg = registry();
    assert_eq!(reg.merge_key("PodSpec", "containers"), Some("name"));
    assert_eq!(reg.merge_key("Container", "volumeMounts"), Some("mountPath"));
    assert_eq!(reg.merge_key("Container", "volume_mounts"), Some("mountPath"));
    assert_eq!(reg.merge_key("PodSpec", "tolerations"), Some("key"));
    assert_eq!(reg.merge_key("DeploymentStatus", "conditions"), Some("type"));
    assert_eq!(reg.merge_key("Container", "command"), None);
    assert_eq!(reg.merge_key("NoSuchType", "containers"), None);

    assert!(reg.is_merge_field("PodSpec", "containers"));
    assert!(reg.is_merge_field("ObjectMeta", "finalizers"));
    assert!(!reg.is_merge_field("Container", "args"));
    assert!(reg.retains_keys("PodSpec", "volumes"));
    assert!(reg.retains_keys("DeploymentSpec", "strategy"));
    assert!(!reg.retains_keys("PodSpec", "containers"));
}

#[test]
fn list_item_kinds() {
    let reg = registry();
    let key_to_path = ListItemKind {
        kind: "KeyToPath",
        version: "v1",
    };
    assert_eq!(reg.list_item_kind("ConfigMapVolumeSource"), Some(key_to_path));
    assert_eq!(reg.list_item_kind("SecretVolumeSource"), Some(key_to_path));
    assert_eq!(reg.list_item_kind("Pod"), None);
}

#[test]
fn recursive_schemas_register_once() {
    let reg = registry();
    let props = reg.get("JSONSchemaProps").unwrap();
    let nested = props.field("properties").unwrap().item_schema().unwrap();
    assert!(std::ptr::eq(props, nested));
    assert_eq!(reg.iter().filter(|s| s.name == "JSONSchemaProps").count(), 1);
    assert_eq!(Pod::KIND, "Pod");
}

#[test]
fn manifests_resolve_to_their_schema() {
    let reg = registry();
    let manifest = serde_json::json!({"apiVersion": "apps/v1", "kind": "Deployment", "metadata": {"name": "web"}});
    assert_eq!(reg.for_value(&manifest).unwrap().name, "Deployment");

    let unknown = serde_json::json!({"apiVersion": "batch/v1", "kind": "Job"});
    assert!(reg.for_value(&unknown).is_err());
    let malformed = serde_json::json!({"apiVersion": "apps/", "kind": "Deployment"});
    assert!(reg.for_value(&malformed).is_err());
}
