//! Operator selection
//!
//! Pure matching of a connector's operator selector against the operator
//! instances currently registered on the cluster. No I/O; deterministic
//! given its inputs.

use crate::crd::{Operator, OperatorSelector};

/// Return the best operator satisfying the selector, if any.
///
/// Matching rules:
/// - `type` must match exactly;
/// - `id`, when the selector carries one, must match exactly, otherwise any
///   id is accepted;
/// - `version`, when the selector carries one, must match exactly, otherwise
///   any version is accepted.
///
/// When several operators match, the one with the highest version wins
/// (dotted-numeric comparison, falling back to lexicographic for non-numeric
/// segments).
pub fn available(selector: &OperatorSelector, operators: &[Operator]) -> Option<Operator> {
    operators
        .iter()
        .filter(|op| op.type_ == selector.type_)
        .filter(|op| selector.id.as_deref().is_none_or(|id| op.id == id))
        .filter(|op| {
            selector
                .version
                .as_deref()
                .is_none_or(|v| op.version == v)
        })
        .max_by(|a, b| compare_versions(&a.version, &b.version))
        .cloned()
}

/// Compare two dotted version strings segment by segment.
///
/// Numeric segments compare numerically, anything else lexicographically;
/// a missing segment compares lower than any present one.
fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return std::cmp::Ordering::Equal,
            (None, Some(_)) => return std::cmp::Ordering::Less,
            (Some(_), None) => return std::cmp::Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    _ => l.cmp(r),
                };
                if ord != std::cmp::Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
