//! Operand controller contract
//!
//! The operand controller turns a connector plus its secret/config inputs
//! into concrete deployable artifacts, polls their health, and tears them
//! down. Tether consumes this contract; the mechanics behind it belong to
//! the operand implementation.

mod metered;
mod noop;

pub use metered::MeteredOperand;
pub use noop::NoopOperand;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::api::DynamicObject;

#[cfg(test)]
use mockall::automock;

use crate::crd::ManagedConnector;
use crate::Result;

/// A resource kind the operand emits and watches
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceType {
    /// API group (empty for the core group)
    pub group: String,
    /// API version
    pub version: String,
    /// Kind
    pub kind: String,
}

impl ResourceType {
    /// Create a resource type descriptor
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }
}

/// Contract of the external operand deployment pipeline
///
/// `reify` must be atomic: it either produces the complete artifact set for
/// a deployment or fails without committing anything. `stop` and `delete`
/// are polled until they report completion; both must be idempotent.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OperandController: Send + Sync {
    /// Resource kinds this operand emits (used to wire watch streams)
    fn resource_types(&self) -> Vec<ResourceType>;

    /// Produce the full set of deployable artifacts for a connector
    async fn reify(
        &self,
        connector: &ManagedConnector,
        secret: &Secret,
        config_map: &ConfigMap,
    ) -> Result<Vec<DynamicObject>>;

    /// Refresh the operand-facing status on the connector
    async fn status(&self, connector: &mut ManagedConnector) -> Result<()>;

    /// Stop the operand; true once it is fully stopped
    async fn stop(&self, connector: &ManagedConnector) -> Result<bool>;

    /// Tear the operand down; true once it is fully removed
    async fn delete(&self, connector: &ManagedConnector) -> Result<bool>;
}
