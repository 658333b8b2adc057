//! Workload-free operand for the bundled binary
//!
//! Real operands live in the crates embedding this engine; the bundled
//! binary wires this one so the full fleet plumbing (claiming, secrets,
//! conditions, hand-off) can be exercised on a cluster without deploying
//! any workload.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::api::DynamicObject;
use tracing::info;

use super::{OperandController, ResourceType};
use crate::crd::{ManagedConnector, STATE_READY};
use crate::Result;

/// Operand that deploys nothing and reports immediate completion
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopOperand;

#[async_trait]
impl OperandController for NoopOperand {
    fn resource_types(&self) -> Vec<ResourceType> {
        Vec::new()
    }

    async fn reify(
        &self,
        connector: &ManagedConnector,
        _secret: &Secret,
        _config_map: &ConfigMap,
    ) -> Result<Vec<DynamicObject>> {
        info!(
            deployment = %connector.spec.deployment_id,
            "no-op operand: nothing to reify"
        );
        Ok(Vec::new())
    }

    async fn status(&self, connector: &mut ManagedConnector) -> Result<()> {
        connector.status_mut().connector_status.phase = STATE_READY.to_string();
        Ok(())
    }

    async fn stop(&self, _connector: &ManagedConnector) -> Result<bool> {
        Ok(true)
    }

    async fn delete(&self, _connector: &ManagedConnector) -> Result<bool> {
        Ok(true)
    }
}
