//! Observability metrics for connector reconciliation.
//!
//! Metrics are exposed via the `metrics` crate facade; `main` installs a
//! Prometheus exporter when a listen address is configured. Recording is a
//! no-op without an installed recorder, so the engine never depends on the
//! sink being present.
//!
//! Every series carries the identity of the recording operator so fleets
//! running several operator instances against one sink stay separable.
//!
//! ## Metrics exported
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `tether_reconcile_total` | Counter | operator identity, `phase`, `connector_id`, `deployment_id`, `resync` |
//! | `tether_reconcile_duration_seconds` | Histogram | operator identity, `phase`, `resync` |
//! | `tether_operand_calls_total` | Counter | operator identity, `call`, `outcome` |
//! | `tether_operand_call_duration_seconds` | Histogram | operator identity, `call` |

use std::time::Duration;

use metrics::{counter, histogram};

use crate::crd::Operator;

/// Metric names as constants for consistency.
pub mod names {
    /// Counter: phase-handler invocations.
    pub const RECONCILE_TOTAL: &str = "tether_reconcile_total";
    /// Histogram: phase-handler duration in seconds.
    pub const RECONCILE_DURATION: &str = "tether_reconcile_duration_seconds";
    /// Counter: operand controller calls.
    pub const OPERAND_CALLS_TOTAL: &str = "tether_operand_calls_total";
    /// Histogram: operand controller call duration in seconds.
    pub const OPERAND_CALL_DURATION: &str = "tether_operand_call_duration_seconds";
}

/// Record one phase-handler invocation.
pub fn record_reconcile(
    operator: &Operator,
    phase: &str,
    connector_id: &str,
    deployment_id: &str,
    resync: bool,
    duration: Duration,
) {
    counter!(
        names::RECONCILE_TOTAL,
        "operator_id" => operator.id.clone(),
        "operator_type" => operator.type_.clone(),
        "operator_version" => operator.version.clone(),
        "phase" => phase.to_string(),
        "connector_id" => connector_id.to_string(),
        "deployment_id" => deployment_id.to_string(),
        "resync" => resync.to_string(),
    )
    .increment(1);
    histogram!(
        names::RECONCILE_DURATION,
        "operator_id" => operator.id.clone(),
        "operator_type" => operator.type_.clone(),
        "operator_version" => operator.version.clone(),
        "phase" => phase.to_string(),
        "resync" => resync.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record one operand controller call.
pub fn record_operand_call(operator: &Operator, call: &'static str, ok: bool, duration: Duration) {
    counter!(
        names::OPERAND_CALLS_TOTAL,
        "operator_id" => operator.id.clone(),
        "operator_type" => operator.type_.clone(),
        "operator_version" => operator.version.clone(),
        "call" => call,
        "outcome" => if ok { "ok" } else { "error" },
    )
    .increment(1);
    histogram!(
        names::OPERAND_CALL_DURATION,
        "operator_id" => operator.id.clone(),
        "operator_type" => operator.type_.clone(),
        "operator_version" => operator.version.clone(),
        "call" => call,
    )
    .record(duration.as_secs_f64());
}
