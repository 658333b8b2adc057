//! Connector reconciliation
//!
//! The controller module hosts the phase state machine converting
//! ManagedConnector records into operand deployments.

mod connector;

pub use connector::{
    error_policy, reconcile, ConnectorClient, ConnectorClientImpl, Context, ContextBuilder,
    Outcome, StatusCommit,
};

#[cfg(test)]
pub use connector::MockConnectorClient;
