//! Labelling, ownership, and naming helpers for operand artifacts
//!
//! Every artifact produced by operand reification is stamped with identity
//! labels (cluster, connector, deployment, operator, revision), the
//! Kubernetes recommended labels, optional admin-configured copy-through
//! labels/annotations, and a blocking owner reference to the connector.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::api::DynamicObject;
use kube::discovery::ApiResource;
use kube::{Resource, ResourceExt};

use crate::crd::ManagedConnector;
use crate::error::Error;

/// Fleet cluster id label
pub const LABEL_CLUSTER_ID: &str = "tether.dev/cluster.id";
/// Logical connector id label
pub const LABEL_CONNECTOR_ID: &str = "tether.dev/connector.id";
/// Connector type id label
pub const LABEL_CONNECTOR_TYPE_ID: &str = "tether.dev/connector.type.id";
/// Deployment id label (natural key of the unit of work)
pub const LABEL_DEPLOYMENT_ID: &str = "tether.dev/deployment.id";
/// Deployment revision label
pub const LABEL_DEPLOYMENT_RESOURCE_VERSION: &str = "tether.dev/deployment.resource.version";
/// Operator family type label
pub const LABEL_OPERATOR_TYPE: &str = "tether.dev/operator.type";
/// Owning operator instance label
pub const LABEL_OPERATOR_OWNER: &str = "tether.dev/operator.owner";
/// Unit-of-work correlation label stamped on connectors and their secrets
pub const LABEL_UOW: &str = "tether.dev/uow";
/// Label naming the operator that reified an artifact
pub const LABEL_CONNECTOR_OPERATOR_OWNED: &str = "tether.dev/connector.operator";

/// Kubernetes recommended label: application name
pub const LABEL_KUBERNETES_NAME: &str = "app.kubernetes.io/name";
/// Kubernetes recommended label: unique instance
pub const LABEL_KUBERNETES_INSTANCE: &str = "app.kubernetes.io/instance";
/// Kubernetes recommended label: version
pub const LABEL_KUBERNETES_VERSION: &str = "app.kubernetes.io/version";
/// Kubernetes recommended label: component within the architecture
pub const LABEL_KUBERNETES_COMPONENT: &str = "app.kubernetes.io/component";
/// Kubernetes recommended label: higher-level application
pub const LABEL_KUBERNETES_PART_OF: &str = "app.kubernetes.io/part-of";
/// Kubernetes recommended label: managing tool
pub const LABEL_KUBERNETES_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
/// Kubernetes recommended label: creating tool
pub const LABEL_KUBERNETES_CREATED_BY: &str = "app.kubernetes.io/created-by";

/// Component value stamped on connector artifacts
pub const COMPONENT_CONNECTOR: &str = "connector";

/// Name of the supporting config record for a deployment
pub fn config_map_name(deployment_id: &str) -> String {
    format!("{deployment_id}-configmap")
}

/// Blocking owner reference pointing at the connector.
///
/// Artifacts and the supporting config record are garbage-collected with
/// the connector through this reference.
pub fn owner_reference(connector: &ManagedConnector) -> Result<OwnerReference, Error> {
    let uid = connector
        .uid()
        .ok_or_else(|| Error::validation("connector has no uid"))?;

    Ok(OwnerReference {
        api_version: ManagedConnector::api_version(&()).to_string(),
        kind: ManagedConnector::kind(&()).to_string(),
        name: connector.name_any(),
        uid,
        block_owner_deletion: Some(true),
        controller: None,
    })
}

/// Copy a single label from the connector onto target metadata, if present.
pub fn copy_label(key: &str, connector: &ManagedConnector, target: &mut ObjectMeta) {
    if let Some(value) = connector.labels().get(key) {
        target
            .labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.clone());
    }
}

/// Copy a single annotation from the connector onto target metadata, if present.
pub fn copy_annotation(key: &str, connector: &ManagedConnector, target: &mut ObjectMeta) {
    if let Some(value) = connector.annotations().get(key) {
        target
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.clone());
    }
}

/// Stamp identity labels, recommended labels, admin copy-through entries,
/// and the owner reference onto one reified artifact.
pub fn stamp_artifact(
    artifact: &mut DynamicObject,
    connector: &ManagedConnector,
    operator_id: &str,
    operator_type: &str,
    target_labels: &[String],
    target_annotations: &[String],
) -> Result<(), Error> {
    let spec = &connector.spec;
    let revision = spec.deployment.deployment_resource_version.to_string();

    let labels = artifact.metadata.labels.get_or_insert_with(BTreeMap::new);
    labels.insert(LABEL_CONNECTOR_OPERATOR_OWNED.into(), operator_id.into());
    labels.insert(LABEL_CONNECTOR_ID.into(), spec.connector_id.clone());
    labels.insert(
        LABEL_CONNECTOR_TYPE_ID.into(),
        spec.deployment.connector_type_id.clone(),
    );
    labels.insert(LABEL_DEPLOYMENT_ID.into(), spec.deployment_id.clone());
    labels.insert(LABEL_CLUSTER_ID.into(), spec.cluster_id.clone());
    labels.insert(LABEL_OPERATOR_TYPE.into(), operator_type.into());
    labels.insert(LABEL_OPERATOR_OWNER.into(), operator_id.into());
    labels.insert(LABEL_DEPLOYMENT_RESOURCE_VERSION.into(), revision.clone());

    // Kubernetes recommended labels
    labels.insert(LABEL_KUBERNETES_NAME.into(), spec.connector_id.clone());
    labels.insert(LABEL_KUBERNETES_INSTANCE.into(), spec.deployment_id.clone());
    labels.insert(LABEL_KUBERNETES_VERSION.into(), revision);
    labels.insert(LABEL_KUBERNETES_COMPONENT.into(), COMPONENT_CONNECTOR.into());
    labels.insert(LABEL_KUBERNETES_PART_OF.into(), spec.cluster_id.clone());
    labels.insert(LABEL_KUBERNETES_MANAGED_BY.into(), operator_id.into());
    labels.insert(LABEL_KUBERNETES_CREATED_BY.into(), operator_id.into());

    for key in target_labels {
        copy_label(key, connector, &mut artifact.metadata);
    }
    for key in target_annotations {
        copy_annotation(key, connector, &mut artifact.metadata);
    }

    artifact.metadata.owner_references = Some(vec![owner_reference(connector)?]);

    Ok(())
}

/// Derive the [`ApiResource`] for a reified artifact from its type metadata.
///
/// Artifacts are untyped [`DynamicObject`]s; the api-server resource path is
/// reconstructed from apiVersion/kind with a fallback pluralization that
/// covers the common Kubernetes rules.
pub fn api_resource_for(artifact: &DynamicObject) -> Result<ApiResource, Error> {
    let types = artifact
        .types
        .as_ref()
        .ok_or_else(|| Error::serialization("artifact has no type metadata"))?;

    let (group, version) = match types.api_version.rfind('/') {
        Some(idx) => (&types.api_version[..idx], &types.api_version[idx + 1..]),
        // core API (e.g. "v1")
        None => ("", types.api_version.as_str()),
    };

    Ok(api_resource_for_kind(group, version, &types.kind))
}

/// Build an [`ApiResource`] from a group/version/kind triple.
///
/// Used to open watch streams on the resource kinds an operand declares,
/// before any artifact of that kind exists.
pub fn api_resource_for_kind(group: &str, version: &str, kind: &str) -> ApiResource {
    let api_version = if group.is_empty() {
        version.to_string()
    } else {
        format!("{group}/{version}")
    };

    ApiResource {
        group: group.to_string(),
        version: version.to_string(),
        api_version,
        kind: kind.to_string(),
        plural: pluralize_kind(kind),
    }
}

/// Convert a Kind to its plural form for Kubernetes API resources.
///
/// Kubernetes pluralization is all lowercase with standard English rules;
/// this covers the kinds operands emit (Deployment, Service, Secret,
/// KafkaConnect, NetworkPolicy, ...).
fn pluralize_kind(kind: &str) -> String {
    let lower = kind.to_lowercase();

    if lower.ends_with('s') || lower.ends_with("ch") || lower.ends_with("sh") {
        format!("{lower}es")
    } else if lower.ends_with('y') && !lower.ends_with("ay") && !lower.ends_with("ey") {
        // policy -> policies, but not gateway -> gateways
        format!("{}ies", &lower[..lower.len() - 1])
    } else {
        format!("{lower}s")
    }
}
