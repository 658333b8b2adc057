//! Drift detection between desired and last-acted-upon deployment descriptors
//!
//! The control plane re-sends deployment descriptors both when something
//! material changed and as periodic resyncs. A resync only rotates the
//! opaque `unitOfWork` token while keeping the same
//! `deploymentResourceVersion`; anything else is real drift and forces the
//! connector back through initialization.

use crate::crd::DeploymentSpec;

/// Classification of the difference between `spec.deployment` and
/// `status.deployment`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriftKind {
    /// Descriptors are identical; proceed with the normal phase handler
    NoDrift,
    /// Only the unit-of-work token changed at the same deployment revision;
    /// re-run the operand pipeline without disturbing the externally visible
    /// operand phase
    Resync,
    /// Materially new desired state; reset to initialization
    Drift,
}

/// Compare the desired descriptor against the last fully-acted-upon one.
///
/// A connector whose status has never recorded a descriptor is treated as
/// drifted: the engine has not acted on anything yet.
pub fn classify(desired: &DeploymentSpec, acted: Option<&DeploymentSpec>) -> DriftKind {
    let Some(acted) = acted else {
        return DriftKind::Drift;
    };

    if desired == acted {
        return DriftKind::NoDrift;
    }

    // A pure resync differs in the unitOfWork token alone, at an unchanged
    // deployment revision.
    let mut desired_masked = desired.clone();
    let mut acted_masked = acted.clone();
    desired_masked.unit_of_work = None;
    acted_masked.unit_of_work = None;

    if desired_masked == acted_masked
        && desired.deployment_resource_version == acted.deployment_resource_version
    {
        DriftKind::Resync
    } else {
        DriftKind::Drift
    }
}
