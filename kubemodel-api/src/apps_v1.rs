//! apps/v1 models
use crate::{core_v1::PodTemplateSpec, meta_v1::LabelSelector};
use kubemodel_core::{metadata::ObjectMeta, IntOrString, ModificationSet, TrackedList};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};

/// Declarative updates for pods and replica sets.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(
    crates(kubemodel_core = "::kubemodel_core"),
    kind = "Deployment",
    group = "apps",
    version = "v1",
    namespaced
)]
#[serde(rename_all = "camelCase", default)]
pub struct Deployment {
    api_version: String,
    kind: String,

    #[tracked(object)]
    metadata: ObjectMeta,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<DeploymentSpec>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<DeploymentStatus>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Desired behaviour of a deployment.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentSpec {
    /// Number of desired pods
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<i32>,

    /// Selects the pods managed by the deployment; immutable once set
    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    selector: Option<LabelSelector>,

    /// Template of the pods created
    #[tracked(object)]
    template: PodTemplateSpec,

    /// How existing pods are replaced with new ones
    #[tracked(object, retain_keys)]
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<DeploymentStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    min_ready_seconds: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    revision_history_limit: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    paused: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    progress_deadline_seconds: Option<i32>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// How pods of a deployment are replaced.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentStrategy {
    /// `Recreate` or `RollingUpdate`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,

    /// Only set when `type` is `RollingUpdate`
    #[tracked(object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    rolling_update: Option<RollingUpdateDeployment>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Controls the pace of a rolling update.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct RollingUpdateDeployment {
    /// Pods that can be unavailable during the update, a number or a percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    max_unavailable: Option<IntOrString>,

    /// Pods that can be created above the desired count, a number or a percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    max_surge: Option<IntOrString>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// Most recently observed status of a deployment.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    observed_generation: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    ready_replicas: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    updated_replicas: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    available_replicas: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    unavailable_replicas: Option<i32>,

    #[tracked(object, merge_key = "type")]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    conditions: TrackedList<DeploymentCondition>,

    #[serde(skip)]
    modifications: ModificationSet,
}

/// State of a deployment at a point in time.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentCondition {
    /// Type of the condition, e.g. `Available` or `Progressing`
    #[serde(rename = "type")]
    type_: String,

    /// One of `True`, `False` and `Unknown`
    status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    last_update_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    last_transition_time: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use kubemodel_core::{
        patch::{apply, diff},
        PatchBuilder, Resource, Tracked as _,
    };
    use serde_json::json;

    fn deployment() -> Deployment {
        serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web", "namespace": "default", "generation": 3},
            "spec": {
                "replicas": 2,
                "selector": {"matchLabels": {"app": "web"}},
                "strategy": {"type": "RollingUpdate", "rollingUpdate": {"maxSurge": "25%", "maxUnavailable": 0}},
                "template": {
                    "metadata": {"labels": {"app": "web"}},
                    "spec": {"containers": [{"name": "app", "image": "nginx:1.27"}]},
                },
            },
            "status": {"conditions": [
                {"type": "Available", "status": "True"},
                {"type": "Progressing", "status": "True"},
            ]},
        }))
        .unwrap()
    }

    #[test]
    fn deployment_identity() {
        assert_eq!(Deployment::API_VERSION, "apps/v1");
        assert_eq!(Deployment::url_path(Some("default")), "/apis/apps/v1/namespaces/default/deployments");
        let d = deployment();
        assert_eq!(d.metadata().generation(), Some(3));
        assert!(!d.is_dirty());
    }

    #[test]
    fn scaling_sends_only_replicas() {
        let mut d = deployment();
        d.spec_mut().set_replicas(5);
        for builder in [PatchBuilder::merge(), PatchBuilder::strategic()] {
            assert_json_eq!(builder.build_value(&d).unwrap(), json!({"spec": {"replicas": 5}}));
        }
    }

    #[test]
    fn switching_strategy_retains_keys() {
        let mut d = deployment();
        let strategy = d.spec_mut().strategy_mut();
        strategy.set_type_("Recreate");
        strategy.clear_rolling_update();
        let patch = PatchBuilder::strategic().build_value(&d).unwrap();
        assert_json_eq!(
            patch,
            json!({"spec": {"strategy": {"type": "Recreate", "rollingUpdate": null, "$retainKeys": ["type"]}}})
        );
        let patch = PatchBuilder::strategic().retain_keys(false).build_value(&d).unwrap();
        assert_json_eq!(patch, json!({"spec": {"strategy": {"type": "Recreate", "rollingUpdate": null}}}));
        let patch = PatchBuilder::merge().build_value(&d).unwrap();
        assert_json_eq!(patch, json!({"spec": {"strategy": {"type": "Recreate", "rollingUpdate": null}}}));
    }

    #[test]
    fn reassigned_strategy_replaces_the_server_value() {
        let server = deployment().to_value().unwrap();
        let mut d = deployment();
        d.spec_mut()
            .set_strategy(DeploymentStrategy::default().with_type_("Recreate"));
        let patch = PatchBuilder::strategic().build_value(&d).unwrap();
        assert_json_eq!(
            patch,
            json!({"spec": {"strategy": {"type": "Recreate", "$patch": "replace"}}})
        );

        let mut applied = server.clone();
        apply::strategic(&mut applied, &patch, Deployment::type_schema()).unwrap();
        assert_json_eq!(applied["spec"]["strategy"], json!({"type": "Recreate"}));

        // merge patches can only merge into what the server has
        let patch = PatchBuilder::merge().build_value(&d).unwrap();
        let mut merged = server;
        apply::merge(&mut merged, &patch);
        assert_json_eq!(
            merged["spec"]["strategy"],
            json!({"type": "Recreate", "rollingUpdate": {"maxSurge": "25%", "maxUnavailable": 0}})
        );
    }

    #[test]
    fn status_conditions_merge_by_type() {
        let mut d = deployment();
        let status = d.status_mut();
        if let Some(cond) = status.conditions_mut().find_mut(|c| c.type_() == "Progressing") {
            cond.set_status("False");
            cond.set_reason("ProgressDeadlineExceeded");
        }
        status.set_unavailable_replicas(1);
        let patch = PatchBuilder::strategic().build_value(&d).unwrap();
        assert_json_eq!(
            patch,
            json!({"status": {
                "unavailableReplicas": 1,
                "conditions": [{"type": "Progressing", "status": "False", "reason": "ProgressDeadlineExceeded"}],
            }})
        );
    }

    #[test]
    fn builder_agrees_with_snapshot_diff() {
        let before = deployment().to_value().unwrap();
        let mut d = deployment();
        d.spec_mut().template_mut().metadata_mut().labels_mut().insert("version", "v2".to_string());
        d.spec_mut().set_min_ready_seconds(10);
        let built = PatchBuilder::strategic().build_value(&d).unwrap();
        let diffed = diff::strategic(&before, &d.to_value().unwrap(), Deployment::type_schema()).unwrap();
        assert_json_eq!(built, diffed);
    }
}
