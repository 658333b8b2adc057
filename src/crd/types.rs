//! Supporting types for the ManagedConnector CRD

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Operand-facing state strings reported to the control plane through
// `status.connectorStatus.phase`. These are wire values, not engine phases.

/// Operand deployment is up and healthy
pub const STATE_READY: &str = "ready";
/// Operand deployment is being provisioned
pub const STATE_PROVISIONING: &str = "provisioning";
/// Operand deployment is being torn down
pub const STATE_DE_PROVISIONING: &str = "deprovisioning";
/// Operand deployment has been stopped
pub const STATE_STOPPED: &str = "stopped";
/// Operand deployment has been fully torn down
pub const STATE_DELETED: &str = "deleted";
/// Operand deployment has failed
pub const STATE_FAILED: &str = "failed";

/// Target lifecycle intent set by the issuing control plane
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// The connector should be deployed and running
    #[default]
    Ready,
    /// The connector should be stopped but retain its record
    Stopped,
    /// The connector should be released from any operator
    Unassigned,
    /// The connector should be torn down entirely
    Deleted,
}

impl std::fmt::Display for DesiredState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Stopped => write!(f, "stopped"),
            Self::Unassigned => write!(f, "unassigned"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Connector reconciliation phase
///
/// `Deleted` and `Error` are terminal: `Deleted` waits for the issuer to
/// remove the record, `Error` requires a spec change to exit.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConnectorPhase {
    /// Desired state is being classified and ownership claimed
    #[default]
    Initialization,
    /// Supporting secret/config resolution and operand reification
    Augmentation,
    /// Operand is deployed; health and operator upgrades are polled
    Monitor,
    /// Operand teardown in progress
    Deleting,
    /// Operand fully torn down, record awaits removal
    Deleted,
    /// Operand stop in progress
    Stopping,
    /// Operand stopped
    Stopped,
    /// Operand stop in progress ahead of a hand-off to another operator
    Transferring,
    /// Stopped and released, ready to be claimed by the selected operator
    Transferred,
    /// Unrecoverable failure, requires external intervention
    Error,
}

impl std::fmt::Display for ConnectorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Condition status following Kubernetes conventions
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// Condition is true
    True,
    /// Condition is false
    False,
    /// Condition status is unknown
    #[default]
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Typed condition categories recorded on the connector ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionType {
    /// Desired state classified, ownership claimed
    Initialization,
    /// Secret/config resolution and reification progress
    Augmentation,
    /// Operand monitoring active
    Monitor,
    /// Connector is fully deployed and healthy
    Ready,
    /// Teardown in progress
    Deleting,
    /// Teardown complete
    Deleted,
    /// Stop in progress
    Stopping,
    /// Stop complete
    Stop,
    /// Current cycle was triggered by a control-plane resync
    Resync,
}

impl ConditionType {
    /// Wire name of the condition type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialization => "Initialization",
            Self::Augmentation => "Augmentation",
            Self::Monitor => "Monitor",
            Self::Ready => "Ready",
            Self::Deleting => "Deleting",
            Self::Deleted => "Deleted",
            Self::Stopping => "Stopping",
            Self::Stop => "Stop",
            Self::Resync => "Resync",
        }
    }
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kubernetes-style condition for status reporting
///
/// One entry per condition type; the ledger in [`crate::conditions`]
/// deduplicates by `type` and only bumps `lastTransitionTime` when the
/// status value actually changes.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct Condition {
    /// Type of condition (e.g. Ready, Augmentation)
    #[serde(rename = "type")]
    pub type_: String,

    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,

    /// Machine-readable reason for the condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last time the condition status changed
    #[serde(rename = "lastTransitionTime")]
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    /// Create a new condition with the current timestamp
    pub fn new(
        type_: impl Into<String>,
        status: ConditionStatus,
        reason: Option<String>,
        message: Option<String>,
    ) -> Self {
        Self {
            type_: type_.into(),
            status,
            reason,
            message,
            last_transition_time: Utc::now(),
        }
    }
}

/// Identity of a running operator instance
///
/// The metadata name of a [`crate::crd::ConnectorOperator`] record is the
/// operator id; type and version come from its spec.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct Operator {
    /// Unique operator instance id
    pub id: String,
    /// Operator family type (e.g. camel, strimzi)
    #[serde(rename = "type")]
    pub type_: String,
    /// Operator version
    pub version: String,
}

impl Operator {
    /// Create an operator identity
    pub fn new(
        id: impl Into<String>,
        type_: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            type_: type_.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.type_, self.id, self.version)
    }
}

/// Declares which operator instance/version family should own a connector
///
/// Absent `id` or `version` means "accept any"; `type` is always required.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct OperatorSelector {
    /// Specific operator instance id, if pinned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Operator family type
    #[serde(rename = "type")]
    pub type_: String,
    /// Specific operator version, if pinned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Kafka connection descriptor for the operand
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct KafkaSpec {
    /// Kafka instance id
    pub id: String,
    /// Bootstrap URL
    pub url: String,
}

/// Schema registry connection descriptor for the operand
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct SchemaRegistrySpec {
    /// Registry instance id
    pub id: String,
    /// Registry URL
    pub url: String,
}

/// Desired deployment descriptor
///
/// `spec.deployment` carries the currently desired descriptor;
/// `status.deployment` holds the last descriptor the engine fully acted
/// upon and exists solely for drift comparison.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Connector type id the operand should instantiate
    pub connector_type_id: String,

    /// Monotonically increasing revision of the deployment on the control plane
    pub deployment_resource_version: i64,

    /// Target lifecycle intent
    pub desired_state: DesiredState,

    /// Kafka connection descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kafka: Option<KafkaSpec>,

    /// Schema registry connection descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_registry: Option<SchemaRegistrySpec>,

    /// Name of the secret carrying connector configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Opaque token correlating this spec generation with its secret generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_work: Option<String>,
}
