//! Custom Resource Definitions for Tether
//!
//! This module contains all CRD definitions used by the Tether operator.

mod connector;
mod operator;
mod types;

pub use connector::{
    ConnectorDeploymentStatus, ManagedConnector, ManagedConnectorSpec, ManagedConnectorStatus,
};
pub use operator::{ConnectorOperator, ConnectorOperatorSpec};
pub use types::{
    Condition, ConditionStatus, ConditionType, ConnectorPhase, DeploymentSpec, DesiredState,
    KafkaSpec, Operator, OperatorSelector, SchemaRegistrySpec, STATE_DELETED,
    STATE_DE_PROVISIONING, STATE_FAILED, STATE_PROVISIONING, STATE_READY, STATE_STOPPED,
};
