//! ManagedConnector Custom Resource Definition
//!
//! A ManagedConnector is the declarative unit of work representing one
//! deployed connector workload. The fleet control plane writes the spec;
//! only the reconciliation engine writes the status.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{
    Condition, ConnectorPhase, DeploymentSpec, Operator, OperatorSelector, STATE_PROVISIONING,
};

/// Specification for a ManagedConnector
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "tether.dev",
    version = "v1alpha1",
    kind = "ManagedConnector",
    plural = "managedconnectors",
    shortname = "mconn",
    status = "ManagedConnectorStatus",
    namespaced,
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Desired","type":"string","jsonPath":".spec.deployment.desiredState"}"#,
    printcolumn = r#"{"name":"Operand","type":"string","jsonPath":".status.connectorStatus.phase"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedConnectorSpec {
    /// Fleet cluster this connector belongs to
    pub cluster_id: String,

    /// Logical connector id on the control plane
    pub connector_id: String,

    /// Deployment id, the natural key of this unit of work
    pub deployment_id: String,

    /// Which operator instance/version family should own this connector
    pub operator_selector: OperatorSelector,

    /// Desired deployment descriptor
    pub deployment: DeploymentSpec,
}

/// Status for a ManagedConnector
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManagedConnectorStatus {
    /// Current engine phase; unset on a freshly created connector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<ConnectorPhase>,

    /// Last deployment descriptor the engine fully acted upon
    ///
    /// Overwritten only at well-defined phase-transition points, never
    /// partially; used exclusively for drift comparison against
    /// `spec.deployment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentSpec>,

    /// Engine-facing condition ledger, one entry per condition type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Operand-facing status reported back to the control plane
    #[serde(default)]
    pub connector_status: ConnectorDeploymentStatus,
}

/// Operand-facing portion of the connector status
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorDeploymentStatus {
    /// Operand-facing state string (provisioning, stopped, failed, ...)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phase: String,

    /// Operand health conditions, owned by the operand controller
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Operator currently owning this connector; at most one at any time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_operator: Option<Operator>,

    /// Better-matching operator observed while monitoring, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_operator: Option<Operator>,
}

impl ManagedConnector {
    /// Mutable access to the status, created on first touch
    pub fn status_mut(&mut self) -> &mut ManagedConnectorStatus {
        self.status.get_or_insert_with(ManagedConnectorStatus::default)
    }

    /// Current engine phase, if any status has been recorded
    pub fn phase(&self) -> Option<ConnectorPhase> {
        self.status.as_ref().and_then(|s| s.phase)
    }

    /// Operator currently claiming ownership, if any
    pub fn assigned_operator(&self) -> Option<&Operator> {
        self.status
            .as_ref()
            .and_then(|s| s.connector_status.assigned_operator.as_ref())
    }

    /// Initialize the status of a freshly observed connector
    ///
    /// Idempotent: does nothing once a phase has been recorded.
    pub fn ensure_initialized(&mut self) {
        let status = self.status_mut();
        if status.phase.is_none() {
            status.phase = Some(ConnectorPhase::Initialization);
            status.connector_status.phase = STATE_PROVISIONING.to_string();
            status.connector_status.conditions.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::types::DesiredState;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn sample_connector() -> ManagedConnector {
        ManagedConnector {
            metadata: ObjectMeta {
                name: Some("d-1".into()),
                namespace: Some("fleet".into()),
                ..Default::default()
            },
            spec: ManagedConnectorSpec {
                cluster_id: "cl-1".into(),
                connector_id: "c-1".into(),
                deployment_id: "d-1".into(),
                operator_selector: OperatorSelector {
                    id: Some("op-a".into()),
                    type_: "camel".into(),
                    version: None,
                },
                deployment: DeploymentSpec {
                    connector_type_id: "aws-s3-sink".into(),
                    deployment_resource_version: 1,
                    desired_state: DesiredState::Ready,
                    ..Default::default()
                },
            },
            status: None,
        }
    }

    /// Story: first observation of a connector seeds its status
    ///
    /// A connector created by the control plane has no status; the engine
    /// assigns Initialization and the provisioning operand state before any
    /// handler runs.
    #[test]
    fn story_fresh_connector_is_initialized_once() {
        let mut connector = sample_connector();
        assert!(connector.phase().is_none());

        connector.ensure_initialized();
        assert_eq!(connector.phase(), Some(ConnectorPhase::Initialization));
        assert_eq!(
            connector.status.as_ref().unwrap().connector_status.phase,
            STATE_PROVISIONING
        );

        // Re-running must not reset an already progressing connector
        connector.status_mut().phase = Some(ConnectorPhase::Monitor);
        connector.ensure_initialized();
        assert_eq!(connector.phase(), Some(ConnectorPhase::Monitor));
    }

    #[test]
    fn test_status_round_trips_camel_case() {
        let status = ManagedConnectorStatus {
            phase: Some(ConnectorPhase::Monitor),
            deployment: None,
            conditions: vec![],
            connector_status: ConnectorDeploymentStatus {
                phase: "provisioning".into(),
                conditions: vec![],
                assigned_operator: Some(Operator::new("op-a", "camel", "1.0.0")),
                available_operator: None,
            },
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("connectorStatus"));
        assert!(json.contains("assignedOperator"));
        let parsed: ManagedConnectorStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, parsed);
    }
}
