//! ConnectorOperator Custom Resource Definition
//!
//! Each running operator instance registers one ConnectorOperator record in
//! its namespace. The metadata name is the operator id; type and version
//! live in the spec. Records are immutable once observed within a single
//! reconcile pass.

use kube::CustomResource;
use kube::ResourceExt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::Operator;

/// Specification for a ConnectorOperator
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "tether.dev",
    version = "v1alpha1",
    kind = "ConnectorOperator",
    plural = "connectoroperators",
    shortname = "cop",
    namespaced,
    printcolumn = r#"{"name":"Type","type":"string","jsonPath":".spec.type"}"#,
    printcolumn = r#"{"name":"Version","type":"string","jsonPath":".spec.version"}"#
)]
pub struct ConnectorOperatorSpec {
    /// Operator family type (e.g. camel, strimzi)
    #[serde(rename = "type")]
    pub type_: String,

    /// Operator version
    pub version: String,
}

impl ConnectorOperator {
    /// The operator identity described by this record
    pub fn identity(&self) -> Operator {
        Operator::new(self.name_any(), &self.spec.type_, &self.spec.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_identity_uses_metadata_name_as_id() {
        let record = ConnectorOperator {
            metadata: ObjectMeta {
                name: Some("camel-operator-1".into()),
                namespace: Some("fleet".into()),
                ..Default::default()
            },
            spec: ConnectorOperatorSpec {
                type_: "camel".into(),
                version: "1.2.0".into(),
            },
        };

        let identity = record.identity();
        assert_eq!(identity.id, "camel-operator-1");
        assert_eq!(identity.type_, "camel");
        assert_eq!(identity.version, "1.2.0");
    }
}
