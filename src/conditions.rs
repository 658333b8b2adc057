//! Condition ledger for ManagedConnector status
//!
//! The ledger is an ordered, de-duplicated set of typed conditions on
//! `status.conditions`. Upserting a condition keeps its position in the
//! list and only bumps `lastTransitionTime` when the status value actually
//! changes, so retries of the same failure do not produce churn.
//!
//! Nothing here talks to the API server; the ledger is persisted when the
//! reconciliation engine commits the status.

use chrono::Utc;

use crate::crd::{Condition, ConditionStatus, ConditionType, ManagedConnector};

/// Upsert a condition with an explicit reason and message.
///
/// Deduplicates by type: an existing entry of the same type is updated in
/// place, keeping its `lastTransitionTime` if the status value is unchanged.
pub fn set_condition(
    connector: &mut ManagedConnector,
    type_: ConditionType,
    status: ConditionStatus,
    reason: impl Into<String>,
    message: impl Into<String>,
) {
    upsert(
        connector,
        type_,
        status,
        Some(reason.into()),
        Some(message.into()),
    );
}

/// Upsert a boolean condition; reason and message default to the type name.
pub fn set_condition_bool(connector: &mut ManagedConnector, type_: ConditionType, value: bool) {
    let status = if value {
        ConditionStatus::True
    } else {
        ConditionStatus::False
    };
    upsert(
        connector,
        type_,
        status,
        Some(type_.as_str().to_string()),
        Some(type_.as_str().to_string()),
    );
}

/// Upsert a boolean condition with an explicit reason (message = reason).
pub fn set_condition_reason(
    connector: &mut ManagedConnector,
    type_: ConditionType,
    value: bool,
    reason: impl Into<String>,
) {
    let reason = reason.into();
    let status = if value {
        ConditionStatus::True
    } else {
        ConditionStatus::False
    };
    upsert(connector, type_, status, Some(reason.clone()), Some(reason));
}

/// Exact-match predicate on (type, status, reason).
pub fn has_condition(
    connector: &ManagedConnector,
    type_: ConditionType,
    status: ConditionStatus,
    reason: &str,
) -> bool {
    connector
        .status
        .as_ref()
        .map(|s| {
            s.conditions.iter().any(|c| {
                c.type_ == type_.as_str()
                    && c.status == status
                    && c.reason.as_deref() == Some(reason)
            })
        })
        .unwrap_or(false)
}

/// Empty the ledger. Used only at phase re-initialization.
pub fn clear_conditions(connector: &mut ManagedConnector) {
    connector.status_mut().conditions.clear();
}

fn upsert(
    connector: &mut ManagedConnector,
    type_: ConditionType,
    status: ConditionStatus,
    reason: Option<String>,
    message: Option<String>,
) {
    let conditions = &mut connector.status_mut().conditions;

    match conditions.iter_mut().find(|c| c.type_ == type_.as_str()) {
        Some(existing) => {
            if existing.status != status {
                existing.last_transition_time = Utc::now();
            }
            existing.status = status;
            existing.reason = reason;
            existing.message = message;
        }
        None => {
            conditions.push(Condition::new(type_.as_str(), status, reason, message));
        }
    }
}
