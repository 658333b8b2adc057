//! Controller wiring and watch streams
//!
//! Sets up the ManagedConnector controller with its auxiliary watch
//! streams: deployment secrets retrigger the connectors referencing them,
//! operator registrations retrigger every connector so better matches get
//! advertised without waiting for the next periodic pass, and each resource
//! kind the operand declares is watched so changes to reified artifacts
//! retrigger the owning connector.

use std::sync::Arc;

use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, DynamicObject};
use kube::runtime::reflector::ObjectRef;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::{Client, ResourceExt};
use tracing::{debug, error, info};

use crate::controller::{error_policy, reconcile, Context};
use crate::crd::{ConnectorOperator, ManagedConnector};
use crate::resources::{self, LABEL_DEPLOYMENT_ID};
use crate::Result;

/// Run the connector controller until shutdown.
///
/// Blocks on the controller stream; returns once a termination signal has
/// drained it.
pub async fn run(client: Client, ctx: Arc<Context>) -> Result<()> {
    let connectors: Api<ManagedConnector> = Api::namespaced(client.clone(), &ctx.namespace);
    let secrets: Api<Secret> = Api::namespaced(client.clone(), &ctx.namespace);
    let operators: Api<ConnectorOperator> = Api::namespaced(client.clone(), &ctx.namespace);

    let controller = Controller::new(connectors, WatcherConfig::default());
    let store = controller.store();

    info!(namespace = %ctx.namespace, operator = %ctx.identity, "starting connector controller");

    let secret_store = store.clone();
    let operator_store = store.clone();
    let mut controller = controller
        .watches(secrets, WatcherConfig::default(), move |secret| {
            connectors_using_secret(&secret_store.state(), &secret.name_any())
        })
        .watches(operators, WatcherConfig::default(), move |operator| {
            // a registration change can make a better operator available for
            // any connector
            debug!(operator = %operator.name_any(), "operator registration changed");
            all_connectors(&operator_store.state())
        });

    // one stream per resource kind the operand emits, so artifact edits and
    // deletions are reconciled away
    for rt in ctx.operand.resource_types() {
        let ar = resources::api_resource_for_kind(&rt.group, &rt.version, &rt.kind);
        info!(kind = %ar.kind, api_version = %ar.api_version, "watching operand resource");

        let artifacts: Api<DynamicObject> =
            Api::namespaced_with(client.clone(), &ctx.namespace, &ar);
        let artifact_store = store.clone();
        controller = controller.watches_with(
            artifacts,
            ar,
            WatcherConfig::default(),
            move |artifact| connectors_owning_artifact(&artifact_store.state(), &artifact),
        );
    }

    controller
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|result| async move {
            match result {
                Ok((connector, action)) => {
                    debug!(connector = %connector.name, ?action, "reconciliation completed");
                }
                Err(e) => {
                    error!(error = ?e, "reconciliation error");
                }
            }
        })
        .await;

    info!("connector controller stopped");
    Ok(())
}

/// Connectors whose deployment references the given secret.
fn connectors_using_secret(
    connectors: &[Arc<ManagedConnector>],
    secret_name: &str,
) -> Vec<ObjectRef<ManagedConnector>> {
    connectors
        .iter()
        .filter(|c| c.spec.deployment.secret.as_deref() == Some(secret_name))
        .map(|c| ObjectRef::from_obj(c.as_ref()))
        .collect()
}

fn all_connectors(connectors: &[Arc<ManagedConnector>]) -> Vec<ObjectRef<ManagedConnector>> {
    connectors
        .iter()
        .map(|c| ObjectRef::from_obj(c.as_ref()))
        .collect()
}

/// The connector owning a reified artifact, resolved through the deployment
/// id stamped on it. Unstamped objects of a watched kind map to nothing.
fn connectors_owning_artifact(
    connectors: &[Arc<ManagedConnector>],
    artifact: &DynamicObject,
) -> Vec<ObjectRef<ManagedConnector>> {
    let Some(deployment_id) = artifact.labels().get(LABEL_DEPLOYMENT_ID) else {
        return Vec::new();
    };

    connectors
        .iter()
        .filter(|c| &c.spec.deployment_id == deployment_id)
        .map(|c| ObjectRef::from_obj(c.as_ref()))
        .collect()
}
