//! Tether - Kubernetes operator for managed connector deployment lifecycle
//!
//! Tether reconciles `ManagedConnector` resources issued by a fleet control
//! plane into concrete operand deployments. Each connector moves through a
//! phase state machine (initialization, augmentation, monitoring, teardown)
//! driven by the declarative desired state on its spec, while ownership of a
//! connector can be handed off between operator instances without ever being
//! claimed by two operators at once.
//!
//! # Modules
//!
//! - [`crd`] - Custom Resource Definitions (ManagedConnector, ConnectorOperator)
//! - [`conditions`] - typed status condition ledger attached to connectors
//! - [`selection`] - operator selector matching against registered operators
//! - [`drift`] - desired-vs-acted-upon deployment descriptor comparison
//! - [`controller`] - the connector reconciliation state machine
//! - [`controller_runner`] - kube-runtime controller and watch-stream wiring
//! - [`operand`] - operand controller contract and metrics decorator
//! - [`resources`] - labelling, ownership, and naming helpers
//! - [`config`] - process-wide operator identity configuration
//! - [`metrics`] - metric names and recording helpers
//! - [`error`] - error types for the operator

#![deny(missing_docs)]

pub mod conditions;
pub mod config;
pub mod controller;
pub mod controller_runner;
pub mod crd;
pub mod drift;
pub mod error;
pub mod metrics;
pub mod operand;
pub mod resources;
pub mod selection;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Default Configuration Constants
// =============================================================================

/// Delay before re-checking a pending external operation (operand stop or
/// teardown still in flight, supporting secret not yet generated).
///
/// This is the only timer-based wait in the engine; everything else is
/// event-driven. A fresh watch event for the same connector supersedes it.
pub const RETRY_REQUEUE: std::time::Duration = std::time::Duration::from_millis(1500);

/// Field manager name used for server-side apply of operand artifacts.
pub const FIELD_MANAGER: &str = "tether-operator";
