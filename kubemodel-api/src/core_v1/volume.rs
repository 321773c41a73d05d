use kubemodel_core::{ModificationSet, TrackedList};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};

/// A named volume in a pod.
///
/// Exactly one of the source fields is expected to be set. The `volumes` list of a pod uses the
/// `retainKeys` strategy, so switching source type removes the old one on the server.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    /// Name of the volume, unique within the pod
    name: String,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    config_map: Option<ConfigMapVolumeSource>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<SecretVolumeSource>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_dir: Option<EmptyDirVolumeSource>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    host_path: Option<HostPathVolumeSource>,

    #[tracked(object)]
    #[serde(rename = "awsElasticBlockStore", skip_serializing_if = "Option::is_none")]
    aws_elastic_block_store: Option<AWSElasticBlockStoreVolumeSource>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    persistent_volume_claim: Option<PersistentVolumeClaimVolumeSource>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Populates a volume with the data of a config map.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"), list_item(kind = "KeyToPath", version = "v1"))]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigMapVolumeSource {
    /// Name of the config map
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Keys to project, all keys when empty
    #[tracked(object)]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    items: TrackedList<KeyToPath>,

    /// Mode bits of created files, `0644` by default
    #[serde(skip_serializing_if = "Option::is_none")]
    default_mode: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    optional: Option<bool>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Populates a volume with the data of a secret.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"), list_item(kind = "KeyToPath", version = "v1"))]
#[serde(rename_all = "camelCase", default)]
pub struct SecretVolumeSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_name: Option<String>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    items: TrackedList<KeyToPath>,

    #[serde(skip_serializing_if = "Option::is_none")]
    default_mode: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    optional: Option<bool>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Maps a key of a config map or secret to a path within a volume.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct KeyToPath {
    key: String,

    /// Relative path of the file, may not contain `..`
    path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<i32>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A temporary directory that shares the pod's lifetime.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct EmptyDirVolumeSource {
    /// Storage medium, `""` or `Memory`
    #[serde(skip_serializing_if = "Option::is_none")]
    medium: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    size_limit: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A file or directory on the host, mapped into the pod.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct HostPathVolumeSource {
    path: String,

    /// Expected type of the path, e.g. `Directory` or `FileOrCreate`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// An AWS EBS disk mounted into the pod.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct AWSElasticBlockStoreVolumeSource {
    /// Unique id of the EBS volume
    #[serde(rename = "volumeID")]
    volume_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    fs_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    partition: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    read_only: Option<bool>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// A reference to a persistent volume claim in the pod's namespace.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct PersistentVolumeClaimVolumeSource {
    claim_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    read_only: Option<bool>,

    #[serde(skip)]
    modifications: ModificationSet,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core_v1::{Pod, PodSpec};
    use assert_json_diff::assert_json_eq;
    use kubemodel_core::{patch::apply, PatchBuilder, Tracked as _};
    use serde_json::json;

    #[test]
    fn wire_names_follow_the_api() {
        let schema = AWSElasticBlockStoreVolumeSource::type_schema();
        assert_eq!(schema.field("volume_id").unwrap().wire_name, "volumeID");
        assert_eq!(schema.field("fsType").unwrap().name, "fs_type");
        assert!(Volume::type_schema().field("awsElasticBlockStore").is_some());

        let mut ebs = AWSElasticBlockStoreVolumeSource::default();
        ebs.set("volumeID", json!("vol-1")).unwrap();
        ebs.set_read_only(true);
        assert_eq!(ebs.modified_fields().collect::<Vec<_>>(), vec!["volumeID", "readOnly"]);
        assert_json_eq!(ebs.to_value().unwrap(), json!({"volumeID": "vol-1", "readOnly": true}));
    }

    #[test]
    fn projected_sources_declare_their_item_kind() {
        let kind = ConfigMapVolumeSource::type_schema().list_item.unwrap();
        assert_eq!((kind.kind, kind.version), ("KeyToPath", "v1"));
        assert_eq!(SecretVolumeSource::type_schema().list_item, Some(kind));
        assert!(Volume::type_schema().list_item.is_none());
    }

    #[test]
    fn switching_volume_source_retains_only_new_keys() {
        let server = json!({"spec": {"containers": [{"name": "app"}], "volumes": [
            {"name": "data", "emptyDir": {}},
            {"name": "config", "configMap": {"name": "settings"}},
        ]}});
        let mut pod: Pod = serde_json::from_value(server.clone()).unwrap();
        let data = pod.spec_mut().volumes_mut().find_mut(|v| v.name() == "data").unwrap();
        data.clear_empty_dir();
        data.set_host_path(HostPathVolumeSource::default().with_path("/srv/data"));

        let patch = PatchBuilder::strategic().build_value(&pod).unwrap();
        assert_json_eq!(
            patch,
            json!({"spec": {"volumes": [{
                "name": "data",
                "emptyDir": null,
                "hostPath": {"path": "/srv/data", "$patch": "replace"},
                "$retainKeys": ["hostPath", "name"],
            }]}})
        );

        let mut applied = server;
        apply::strategic(&mut applied, &patch, Pod::type_schema()).unwrap();
        assert_json_eq!(
            applied["spec"]["volumes"],
            json!([
                {"name": "data", "hostPath": {"path": "/srv/data"}},
                {"name": "config", "configMap": {"name": "settings"}},
            ])
        );
        assert!(PodSpec::type_schema().field("volumes").unwrap().strategy.retain_keys);
    }
}
