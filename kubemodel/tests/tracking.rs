//! Change tracking and patch generation through the umbrella crate
use assert_json_diff::assert_json_eq;
use kubemodel::{
    api::core_v1::{Container, Pod, PodSpec},
    core::{
        codec, patch::apply, Error, ModificationSet, PatchBuilder, PatchParams, Request, TrackedList,
    },
    Tracked,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// A named mount
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Mount {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mount_path: Option<String>,
    #[serde(skip)]
    modifications: ModificationSet,
}

/// A list of mounts keyed by name next to plain fields
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Workload {
    #[tracked(object, merge_key = "name")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    mounts: TrackedList<Mount>,
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    command: TrackedList<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<i32>,
    #[serde(skip)]
    modifications: ModificationSet,
}

fn workload() -> Workload {
    serde_json::from_value(json!({
        "mounts": [{"name": "a", "mountPath": "/x"}, {"name": "b", "mountPath": "/y"}],
        "command": ["sh", "-c"],
        "replicas": 1,
    }))
    .unwrap()
}

#[test]
fn assignment_marks_fields() {
    init();
    let mut w = workload();
    for field in ["mounts", "command", "replicas"] {
        assert!(!w.is_modified(field).unwrap());
    }
    // same value as before
    w.set_replicas(1);
    assert!(w.is_modified("replicas").unwrap());
    assert!(!w.is_modified("command").unwrap());

    w.set("command", json!(["sh", "-c"])).unwrap();
    assert!(w.is_modified("command").unwrap());
    assert!(matches!(w.is_modified("cmd"), Err(Error::SchemaMismatch(_))));
}

#[test]
fn marking_without_assignment() {
    let mut w = workload();
    w.mark_modified("replicas").unwrap();
    assert!(w.is_modified("replicas").unwrap());
    assert_eq!(w.replicas(), Some(1));
    assert_json_eq!(PatchBuilder::merge().build_value(&w).unwrap(), json!({"replicas": 1}));

    let mut m = Mount::default().with_name("a");
    m.mark_modified("mount_path").unwrap();
    assert!(m.modifications().contains("mountPath"));
    assert_json_eq!(PatchBuilder::merge().build_value(&m).unwrap(), json!({"name": "a", "mountPath": null}));

    let before = w.modifications().clone();
    let err = w.mark_modified("replica").unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch(ref e) if e.type_name == "Workload" && e.field == "replica"));
    assert_eq!(w.modifications(), &before);
    assert_eq!(w.modified_fields().collect::<Vec<_>>(), vec!["replicas"]);
}

#[test]
fn repeated_assignment_is_idempotent() {
    let mut once = workload();
    once.set_replicas(4);
    let mut twice = workload();
    twice.set_replicas(4);
    twice.set_replicas(4);
    assert_eq!(once.modifications(), twice.modifications());
    assert_eq!(twice.modifications().len(), 1);
    assert_eq!(
        PatchBuilder::merge().build_value(&once).unwrap(),
        PatchBuilder::merge().build_value(&twice).unwrap()
    );
}

#[test]
fn round_trip_keeps_values_and_starts_clean() {
    let mut w = workload();
    w.set_command(["bash", "-c"]);
    w.mounts_mut().push(Mount::default().with_name("c").with_mount_path("/w"));
    assert!(w.is_dirty());

    let json = codec::to_json(&w).unwrap();
    let copy: Workload = codec::from_json(&json).unwrap();
    assert_eq!(copy, w);
    assert!(!copy.is_dirty());
    assert_eq!(copy.modified_fields().count(), 0);
    assert_eq!(copy.mounts()[2].mount_path(), Some("/w"));
}

#[test]
fn keyed_element_edit_patches_only_that_element() {
    init();
    let server = json!({"mounts": [{"name": "a", "mountPath": "/x"}, {"name": "b", "mountPath": "/y"}]});
    let mut w = workload();
    w.mounts_mut().find_mut(|m| m.name() == "b").unwrap().set_mount_path("/z");

    let patch = PatchBuilder::strategic().build_value(&w).unwrap();
    assert_json_eq!(patch, json!({"mounts": [{"name": "b", "mountPath": "/z"}]}));

    let mut applied = server;
    apply::strategic(&mut applied, &patch, Workload::type_schema()).unwrap();
    assert_json_eq!(
        applied,
        json!({"mounts": [{"name": "a", "mountPath": "/x"}, {"name": "b", "mountPath": "/z"}]})
    );
}

#[test]
fn non_keyed_list_is_replaced_whole() {
    let mut w = workload();
    w.set_command(["bash", "-c"]);
    for builder in [PatchBuilder::merge(), PatchBuilder::strategic()] {
        assert_json_eq!(builder.build_value(&w).unwrap(), json!({"command": ["bash", "-c"]}));
    }
}

#[test]
fn empty_collections_are_omitted() {
    let fresh = Workload::default();
    assert_json_eq!(fresh.to_value().unwrap(), json!({}));

    let mut w = workload();
    w.set_command(Vec::<String>::new());
    assert!(w.is_modified("command").unwrap());
    // the serialized object omits the empty list, the patch clears it on the server
    assert!(w.to_value().unwrap().get("command").is_none());
    assert_json_eq!(PatchBuilder::merge().build_value(&w).unwrap(), json!({"command": null}));

    w.mounts_mut().clear();
    assert_json_eq!(
        PatchBuilder::strategic().build_value(&w).unwrap(),
        json!({"mounts": null, "command": null})
    );
}

#[test]
fn renaming_a_keyed_element_replaces_the_list() {
    init();
    let server = json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {"name": "web"},
        "spec": {"containers": [{"name": "a", "image": "x"}, {"name": "b", "image": "y"}]},
    });
    let mut pod: Pod = serde_json::from_value(server.clone()).unwrap();
    pod.spec_mut()
        .containers_mut()
        .find_mut(|c| c.name() == "b")
        .unwrap()
        .set_name("c");
    assert!(!pod.spec().unwrap().containers().is_changed());

    let patch = PatchBuilder::strategic().build_value(&pod).unwrap();
    let containers = patch["spec"]["containers"].as_array().unwrap();
    assert_eq!(containers.len(), 3);
    assert_eq!(containers[2], json!({"$patch": "replace"}));

    let mut applied = server;
    apply::strategic(&mut applied, &patch, Pod::type_schema()).unwrap();
    assert_json_eq!(applied, pod.to_value().unwrap());
    assert_json_eq!(
        applied["spec"]["containers"],
        json!([{"name": "a", "image": "x"}, {"name": "c", "image": "y"}])
    );
}

#[test]
fn reassigned_object_replaces_the_server_value() {
    let server = json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {"name": "web"},
        "spec": {"nodeName": "n1", "containers": [{"name": "a", "image": "x"}, {"name": "b", "image": "y"}]},
    });
    let mut pod: Pod = serde_json::from_value(server.clone()).unwrap();
    pod.set_spec(PodSpec::default().with_containers([Container::default().with_name("a").with_image("z")]));

    let patch = PatchBuilder::strategic().build_value(&pod).unwrap();
    assert_eq!(patch["spec"]["$patch"], "replace");
    let mut applied = server.clone();
    apply::strategic(&mut applied, &patch, Pod::type_schema()).unwrap();
    assert_json_eq!(applied, pod.to_value().unwrap());
    assert!(applied["spec"].get("nodeName").is_none());

    // a merge patch cannot drop what the server has beyond the new value
    let patch = PatchBuilder::merge().build_value(&pod).unwrap();
    assert!(patch["spec"].get("$patch").is_none());
    let mut merged = server;
    apply::merge(&mut merged, &patch);
    assert_eq!(merged["spec"]["nodeName"], "n1");
}

#[test]
fn missing_merge_key_aborts_the_patch() {
    init();
    let mut w = workload();
    w.mounts_mut().find_mut(|m| m.name() == "a").unwrap().set_mount_path("/v");
    w.mounts_mut().push(Mount::default().with_mount_path("/nameless"));

    let err = PatchBuilder::strategic().build_value(&w).unwrap_err();
    let Error::MissingMergeKey(err) = err else {
        panic!("unexpected error {err}");
    };
    assert_eq!((err.type_name, err.field, err.merge_key, err.index), ("Workload", "mounts", "name", 2));

    // merge patches replace the list and need no key
    assert!(PatchBuilder::merge().build_value(&w).is_ok());

    let req = Request::new("/apis/example.dev/v1/namespaces/ns/workloads");
    let res = req.patch_tracked("w", &PatchParams::default(), &PatchBuilder::strategic(), &w);
    assert!(matches!(res, Err(Error::MissingMergeKey(_))));
}

#[test]
fn yaml_manifest_to_strategic_request() {
    init();
    let pod: Pod = codec::from_yaml(
        "apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\n  namespace: prod\nspec:\n  containers:\n  - name: app\n    image: nginx:1.27\n    command: [nginx]\n  - name: sidecar\n    image: envoy:1.30\n",
    )
    .unwrap();
    assert!(!pod.is_dirty());

    let mut pod = pod;
    let spec: &mut PodSpec = pod.spec_mut();
    spec.containers_mut()
        .find_mut(|c| c.name() == "sidecar")
        .unwrap()
        .set_image("envoy:1.31");
    spec.set_node_selector([("disktype", "ssd")]);

    let req = Request::for_resource::<Pod>(Some("prod"));
    let http = req
        .patch_tracked("web", &PatchParams::default(), &PatchBuilder::strategic(), &pod)
        .unwrap();
    assert_eq!(http.uri(), "/api/v1/namespaces/prod/pods/web?");
    assert_eq!(
        http.headers()["content-type"],
        "application/strategic-merge-patch+json"
    );
    let body: serde_json::Value = serde_json::from_slice(http.body()).unwrap();
    assert_json_eq!(
        body,
        json!({"spec": {
            "containers": [{"name": "sidecar", "image": "envoy:1.31"}],
            "nodeSelector": {"disktype": "ssd"},
        }})
    );
}

#[test]
fn builder_and_snapshot_diff_agree_on_the_server_result() {
    init();
    let server = json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {"name": "web", "labels": {"app": "web"}},
        "spec": {"containers": [
            {"name": "app", "image": "nginx:1.27", "env": [{"name": "MODE", "value": "a"}]},
        ]},
    });
    let mut pod: Pod = serde_json::from_value(server.clone()).unwrap();
    let app: &mut Container = pod.spec_mut().containers_mut().get_mut(0).unwrap();
    app.env_mut().get_mut(0).unwrap().set_value("b");
    app.set_args(["--verbose"]);
    pod.metadata_mut().labels_mut().insert("tier", "frontend".to_string());

    let built = PatchBuilder::strategic().build_value(&pod).unwrap();
    let diffed =
        kubemodel::core::patch::diff::strategic(&server, &pod.to_value().unwrap(), Pod::type_schema()).unwrap();

    let mut via_builder = server.clone();
    apply::strategic(&mut via_builder, &built, Pod::type_schema()).unwrap();
    let mut via_diff = server;
    apply::strategic(&mut via_diff, &diffed, Pod::type_schema()).unwrap();
    assert_json_eq!(via_builder, via_diff);
    assert_json_eq!(via_builder, pod.to_value().unwrap());
}
