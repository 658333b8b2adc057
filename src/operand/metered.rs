//! Metrics decorator for the operand controller
//!
//! Wraps any [`OperandController`] in a timing/counting adapter exposing the
//! same contract. Plain composition: callers hold the wrapper where they
//! held the inner controller.

use std::time::Instant;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::api::DynamicObject;

use super::{OperandController, ResourceType};
use crate::crd::{ManagedConnector, Operator};
use crate::metrics::record_operand_call;
use crate::Result;

/// Operand controller wrapper recording a counter and duration per call,
/// tagged with the identity of the recording operator
pub struct MeteredOperand<T> {
    inner: T,
    operator: Operator,
}

impl<T: OperandController> MeteredOperand<T> {
    /// Wrap an operand controller
    pub fn new(inner: T, operator: Operator) -> Self {
        Self { inner, operator }
    }
}

#[async_trait]
impl<T: OperandController> OperandController for MeteredOperand<T> {
    fn resource_types(&self) -> Vec<ResourceType> {
        self.inner.resource_types()
    }

    async fn reify(
        &self,
        connector: &ManagedConnector,
        secret: &Secret,
        config_map: &ConfigMap,
    ) -> Result<Vec<DynamicObject>> {
        let start = Instant::now();
        let result = self.inner.reify(connector, secret, config_map).await;
        record_operand_call(&self.operator, "reify", result.is_ok(), start.elapsed());
        result
    }

    async fn status(&self, connector: &mut ManagedConnector) -> Result<()> {
        let start = Instant::now();
        let result = self.inner.status(connector).await;
        record_operand_call(&self.operator, "status", result.is_ok(), start.elapsed());
        result
    }

    async fn stop(&self, connector: &ManagedConnector) -> Result<bool> {
        let start = Instant::now();
        let result = self.inner.stop(connector).await;
        record_operand_call(&self.operator, "stop", result.is_ok(), start.elapsed());
        result
    }

    async fn delete(&self, connector: &ManagedConnector) -> Result<bool> {
        let start = Instant::now();
        let result = self.inner.delete(connector).await;
        record_operand_call(&self.operator, "delete", result.is_ok(), start.elapsed());
        result
    }
}
