//! apiextensions.k8s.io/v1 models
use kubemodel_core::{ModificationSet, TrackedList, TrackedMap};
use kubemodel_derive::Tracked;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-Schema following Specification Draft 4, as used by custom resource validation.
///
/// Schemas nest through `properties`, `allOf`, `anyOf` and `oneOf`. The polymorphic
/// `items`, `not` and `additionalProperties` fields, which hold either a schema or a boolean, are
/// kept as raw values.
#[derive(Tracked, Serialize, Deserialize, Clone, Debug)]
#[tracked(crates(kubemodel_core = "::kubemodel_core"))]
#[serde(rename_all = "camelCase", default)]
pub struct JSONSchemaProps {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    json_schema: Option<String>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,

    /// Default applied by the server when the field is absent
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,

    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "TrackedList::is_empty")]
    enum_values: TrackedList<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    min_items: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_items: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    nullable: Option<bool>,

    /// Names of the properties that must be present
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    required: TrackedList<String>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "TrackedMap::is_empty")]
    properties: TrackedMap<JSONSchemaProps>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    all_of: TrackedList<JSONSchemaProps>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    any_of: TrackedList<JSONSchemaProps>,

    #[tracked(object)]
    #[serde(skip_serializing_if = "TrackedList::is_empty")]
    one_of: TrackedList<JSONSchemaProps>,

    /// Schema of array items, or an array of schemas
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    not: Option<Value>,

    /// Schema of undeclared properties, or a boolean
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_properties: Option<Value>,

    /// Stop the server from pruning fields that are not declared
    #[serde(
        rename = "x-kubernetes-preserve-unknown-fields",
        skip_serializing_if = "Option::is_none"
    )]
    x_kubernetes_preserve_unknown_fields: Option<bool>,

    #[serde(rename = "x-kubernetes-int-or-string", skip_serializing_if = "Option::is_none")]
    x_kubernetes_int_or_string: Option<bool>,

    #[serde(rename = "x-kubernetes-list-type", skip_serializing_if = "Option::is_none")]
    x_kubernetes_list_type: Option<String>,

    #[serde(skip)]
    modifications: ModificationSet,
}

impl JSONSchemaProps {
    /// A schema of the given `type`
    pub fn typed(type_: &str) -> Self {
        Self::default().with_type_(type_)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use kubemodel_core::{PatchBuilder, Tracked as _};
    use serde_json::json;

    fn schema() -> JSONSchemaProps {
        serde_yaml::from_str(
            r#"
type: object
required: [spec]
properties:
  spec:
    type: object
    properties:
      replicas:
        type: integer
        minimum: 0
        default: 1
      mode:
        type: string
        enum: [fast, safe]
  status:
    type: object
    x-kubernetes-preserve-unknown-fields: true
"#,
        )
        .unwrap()
    }

    #[test]
    fn special_wire_names() {
        let schema = JSONSchemaProps::type_schema();
        for wire in ["$schema", "$ref", "default", "enum", "type", "x-kubernetes-preserve-unknown-fields"] {
            assert!(schema.field(wire).is_some(), "missing {wire}");
        }
        assert_eq!(schema.field("ref_path").unwrap().wire_name, "$ref");

        let props = JSONSchemaProps::default()
            .with_json_schema("http://json-schema.org/draft-04/schema#")
            .with_ref_path("#/definitions/spec");
        assert_json_eq!(
            props.to_value().unwrap(),
            json!({"$schema": "http://json-schema.org/draft-04/schema#", "$ref": "#/definitions/spec"})
        );
    }

    #[test]
    fn yaml_schema_reads_clean() {
        let s = schema();
        assert!(!s.is_dirty());
        let status = s.properties().get("status").unwrap();
        assert_eq!(status.x_kubernetes_preserve_unknown_fields(), Some(true));
        let replicas = &s.properties()["spec"].properties()["replicas"];
        assert_eq!(replicas.minimum(), Some(0.0));
        assert_eq!(replicas.default_value(), Some(&json!(1)));
        assert_eq!(s.required().first().map(String::as_str), Some("spec"));
    }

    #[test]
    fn nested_property_edits_patch_by_name() {
        let mut s = schema();
        let spec = s.properties_mut().get_mut("spec").unwrap();
        spec.properties_mut()
            .get_mut("mode")
            .unwrap()
            .set_enum_values(["fast", "safe", "paranoid"]);
        spec.properties_mut().insert("paused", JSONSchemaProps::typed("boolean"));

        let patch = PatchBuilder::merge().build_value(&s).unwrap();
        assert_json_eq!(
            patch,
            json!({"properties": {"spec": {"properties": {
                "mode": {"enum": ["fast", "safe", "paranoid"]},
                "paused": {"type": "boolean"},
            }}}})
        );
    }
}
