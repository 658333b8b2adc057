//! ManagedConnector controller implementation
//!
//! This module implements the reconciliation state machine for
//! ManagedConnector resources. Each watch event classifies operator
//! ownership, runs the handler for the record's current phase, and commits
//! the mutated status through an optimistic-concurrency write. Handlers
//! only ever touch the status sub-structure; the spec belongs to the
//! control plane.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::api::{Api, DynamicObject, Patch, PatchParams, PostParams};
use kube::runtime::controller::Action;
use kube::{Client, ResourceExt};
use tracing::{debug, error, info, instrument, warn};

#[cfg(test)]
use mockall::automock;

use crate::conditions::{
    clear_conditions, has_condition, set_condition, set_condition_bool, set_condition_reason,
};
use crate::config::OperatorConfig;
use crate::crd::{
    ConditionStatus, ConditionType, ConnectorOperator, ConnectorPhase, ManagedConnector, Operator,
    STATE_DELETED, STATE_DE_PROVISIONING, STATE_FAILED, STATE_PROVISIONING, STATE_STOPPED,
};
use crate::drift::{classify, DriftKind};
use crate::error::Error;
use crate::metrics::record_reconcile;
use crate::operand::OperandController;
use crate::resources::{
    self, LABEL_CLUSTER_ID, LABEL_CONNECTOR_ID, LABEL_DEPLOYMENT_ID, LABEL_OPERATOR_TYPE,
    LABEL_UOW,
};
use crate::selection;
use crate::{Result, FIELD_MANAGER, RETRY_REQUEUE};

/// Result of a status commit attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCommit {
    /// The write was accepted
    Committed,
    /// The record moved underneath us; retry with a fresh read
    Conflict,
}

/// What a phase handler decided for this reconcile attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Commit the mutated status
    UpdateStatus,
    /// Nothing to persist; wait for the next watch event
    NoUpdate,
    /// Nothing to persist; re-check after the given delay
    RequeueAfter(Duration),
}

/// Trait abstracting Kubernetes client operations for connectors
///
/// This trait allows mocking the Kubernetes client in tests while using
/// the real client in production.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConnectorClient: Send + Sync {
    /// Replace the connector status, guarded by the record's resourceVersion.
    ///
    /// A conflict is an expected race, not an error: the caller requeues and
    /// the next attempt reads fresh state.
    async fn replace_status(&self, connector: &ManagedConnector) -> Result<StatusCommit>;

    /// Fetch a secret by namespace and name
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>>;

    /// Fetch a config map by namespace and name
    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<Option<ConfigMap>>;

    /// Create a config map; creating one that already exists is not an error
    async fn create_config_map(&self, config_map: &ConfigMap) -> Result<()>;

    /// Server-side apply one reified artifact
    async fn apply_artifact(&self, namespace: &str, artifact: &DynamicObject) -> Result<()>;

    /// List the operator instances registered in the given namespace
    async fn list_operators(&self, namespace: &str) -> Result<Vec<Operator>>;
}

/// Real Kubernetes client implementation
pub struct ConnectorClientImpl {
    client: Client,
}

impl ConnectorClientImpl {
    /// Create a new ConnectorClientImpl wrapping the given kube Client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConnectorClient for ConnectorClientImpl {
    async fn replace_status(&self, connector: &ManagedConnector) -> Result<StatusCommit> {
        let namespace = namespace_of(connector)?;
        let api: Api<ManagedConnector> = Api::namespaced(self.client.clone(), &namespace);

        let data = serde_json::to_vec(connector).map_err(|e| Error::serialization(e.to_string()))?;

        match api
            .replace_status(&connector.name_any(), &PostParams::default(), data)
            .await
        {
            Ok(_) => Ok(StatusCommit::Committed),
            Err(kube::Error::Api(ae)) if ae.code == 409 => Ok(StatusCommit::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<Option<ConfigMap>> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn create_config_map(&self, config_map: &ConfigMap) -> Result<()> {
        let namespace = config_map
            .metadata
            .namespace
            .as_deref()
            .ok_or_else(|| Error::validation("config map has no namespace"))?;
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);

        match api.create(&PostParams::default(), config_map).await {
            Ok(_) => Ok(()),
            // a concurrent attempt already created it
            Err(kube::Error::Api(ae)) if ae.code == 409 => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_artifact(&self, namespace: &str, artifact: &DynamicObject) -> Result<()> {
        let ar = resources::api_resource_for(artifact)?;
        let api: Api<DynamicObject> = Api::namespaced_with(self.client.clone(), namespace, &ar);

        api.patch(
            &artifact.name_any(),
            &PatchParams::apply(FIELD_MANAGER).force(),
            &Patch::Apply(artifact),
        )
        .await?;

        Ok(())
    }

    async fn list_operators(&self, namespace: &str) -> Result<Vec<Operator>> {
        let api: Api<ConnectorOperator> = Api::namespaced(self.client.clone(), namespace);
        let records = api.list(&Default::default()).await?;
        Ok(records.items.iter().map(ConnectorOperator::identity).collect())
    }
}

/// Controller context containing shared state and clients
///
/// The context is shared across all reconciliation calls and holds the
/// operator's own identity plus the clients for the record substrate and
/// the operand pipeline.
pub struct Context {
    /// Kubernetes client for record operations (trait object for testability)
    pub kube: Arc<dyn ConnectorClient>,
    /// Operand deployment pipeline
    pub operand: Arc<dyn OperandController>,
    /// This operator's identity, read-only after startup
    pub identity: Operator,
    /// Namespace holding operator registration records
    pub namespace: String,
    /// Connector labels copied onto reified artifacts
    pub target_labels: Vec<String>,
    /// Connector annotations copied onto reified artifacts
    pub target_annotations: Vec<String>,
}

impl Context {
    /// Create a builder for constructing a Context
    pub fn builder(
        client: Client,
        operand: Arc<dyn OperandController>,
        config: &OperatorConfig,
    ) -> ContextBuilder {
        ContextBuilder {
            client,
            kube: None,
            operand,
            identity: config.identity(),
            namespace: config.namespace.clone(),
            target_labels: config.target_labels.clone(),
            target_annotations: config.target_annotations.clone(),
        }
    }

    /// Create a context for testing with mock clients
    #[cfg(test)]
    pub fn for_testing(
        kube: Arc<dyn ConnectorClient>,
        operand: Arc<dyn OperandController>,
        identity: Operator,
    ) -> Self {
        Self {
            kube,
            operand,
            identity,
            namespace: "fleet".to_string(),
            target_labels: Vec::new(),
            target_annotations: Vec::new(),
        }
    }
}

/// Builder for constructing [`Context`] instances
pub struct ContextBuilder {
    client: Client,
    kube: Option<Arc<dyn ConnectorClient>>,
    operand: Arc<dyn OperandController>,
    identity: Operator,
    namespace: String,
    target_labels: Vec<String>,
    target_annotations: Vec<String>,
}

impl ContextBuilder {
    /// Override the Kubernetes client (primarily for testing)
    pub fn kube_client(mut self, kube: Arc<dyn ConnectorClient>) -> Self {
        self.kube = Some(kube);
        self
    }

    /// Build the Context
    pub fn build(self) -> Context {
        Context {
            kube: self
                .kube
                .unwrap_or_else(|| Arc::new(ConnectorClientImpl::new(self.client.clone()))),
            operand: self.operand,
            identity: self.identity,
            namespace: self.namespace,
            target_labels: self.target_labels,
            target_annotations: self.target_annotations,
        }
    }
}

/// Reconcile a ManagedConnector resource
///
/// Classifies ownership, dispatches to the handler matching the record's
/// current phase, and commits the mutated status. All recoverable failures
/// are absorbed into the condition ledger; only invariant violations and
/// substrate errors reach the error policy.
#[instrument(skip(connector, ctx), fields(connector = %connector.name_any()))]
pub async fn reconcile(connector: Arc<ManagedConnector>, ctx: Arc<Context>) -> Result<Action> {
    let mut connector = (*connector).clone();

    info!(phase = ?connector.phase(), "reconciling connector");

    let selected = is_selected(&connector, &ctx.identity);
    let assigned = is_assigned(&connector, &ctx.identity);

    let outcome = if !selected && !assigned {
        // managed by another operator entirely
        debug!(
            selector = ?connector.spec.operator_selector.id,
            "connector is not managed by this operator"
        );
        Outcome::NoUpdate
    } else if !selected {
        // assigned here, but the control plane wants another operator:
        // hand-off is owed
        match connector.phase() {
            Some(
                ConnectorPhase::Error | ConnectorPhase::Transferring | ConnectorPhase::Transferred,
            ) => {
                // already releasing; keep making progress while waiting to
                // be claimed
                run_phase(&mut connector, &ctx).await?
            }
            _ => {
                debug!(
                    to = ?connector.spec.operator_selector.id,
                    "connector must be handed off to another operator"
                );
                connector.status_mut().phase = Some(ConnectorPhase::Transferring);
                Outcome::UpdateStatus
            }
        }
    } else if !assigned {
        // selected here but not yet claimed
        let still_claimed = connector
            .assigned_operator()
            .map(|op| !op.id.is_empty())
            .unwrap_or(false);

        if still_claimed {
            debug!(
                holder = ?connector.assigned_operator().map(|op| op.id.clone()),
                "waiting for connector to be released by its current operator"
            );
            Outcome::NoUpdate
        } else {
            run_phase(&mut connector, &ctx).await?
        }
    } else {
        run_phase(&mut connector, &ctx).await?
    };

    commit(&connector, &ctx, outcome).await
}

/// Error policy for the controller
///
/// Unexpected failures are fatal to the single reconcile attempt only; the
/// record is retried after a delay (or sooner, if a fresh watch event for
/// it arrives first).
pub fn error_policy(connector: Arc<ManagedConnector>, error: &Error, _ctx: Arc<Context>) -> Action {
    error!(
        ?error,
        connector = %connector.name_any(),
        "reconciliation failed"
    );
    Action::requeue(Duration::from_secs(5))
}

async fn commit(connector: &ManagedConnector, ctx: &Context, outcome: Outcome) -> Result<Action> {
    match outcome {
        Outcome::NoUpdate => Ok(Action::await_change()),
        Outcome::RequeueAfter(delay) => Ok(Action::requeue(delay)),
        Outcome::UpdateStatus => match ctx.kube.replace_status(connector).await? {
            StatusCommit::Committed => Ok(Action::await_change()),
            StatusCommit::Conflict => {
                // expected race with a concurrent writer; retry on fresh state
                debug!("status write conflict, retrying with a fresh read");
                Ok(Action::requeue(RETRY_REQUEUE))
            }
        },
    }
}

async fn run_phase(connector: &mut ManagedConnector, ctx: &Context) -> Result<Outcome> {
    connector.ensure_initialized();

    let phase = connector.phase().unwrap_or_default();
    let resync = is_resync(connector);
    let started = Instant::now();

    let result = match phase {
        ConnectorPhase::Initialization => handle_initialization(connector, ctx),
        ConnectorPhase::Augmentation => handle_augmentation(connector, ctx).await,
        ConnectorPhase::Monitor => handle_monitor(connector, ctx).await,
        ConnectorPhase::Deleting => handle_deleting(connector, ctx).await,
        ConnectorPhase::Deleted => handle_deleted(connector),
        ConnectorPhase::Stopping => handle_stopping(connector, ctx).await,
        ConnectorPhase::Stopped => handle_stopped(connector),
        ConnectorPhase::Transferring => handle_transferring(connector, ctx).await,
        ConnectorPhase::Transferred => handle_transferred(connector),
        ConnectorPhase::Error => handle_error(connector),
    };

    record_reconcile(
        &ctx.identity,
        &phase.to_string(),
        &connector.spec.connector_id,
        &connector.spec.deployment_id,
        resync,
        started.elapsed(),
    );

    result
}

// **************************************************
//
// Handlers
//
// **************************************************

fn handle_initialization(connector: &mut ManagedConnector, ctx: &Context) -> Result<Outcome> {
    clear_conditions(connector);
    set_condition_bool(connector, ConditionType::Initialization, true);
    set_condition_reason(connector, ConditionType::Ready, false, "Initialization");

    use crate::crd::DesiredState;
    match connector.spec.deployment.desired_state {
        DesiredState::Unassigned | DesiredState::Deleted => {
            set_condition_reason(connector, ConditionType::Deleting, true, "Deleting");

            let deployment = connector.spec.deployment.clone();
            let status = connector.status_mut();
            status.deployment = Some(deployment);
            status.phase = Some(ConnectorPhase::Deleting);
            status.connector_status.phase = STATE_DE_PROVISIONING.to_string();
            status.connector_status.conditions.clear();
        }
        DesiredState::Stopped => {
            set_condition_reason(connector, ConditionType::Stopping, true, "Stopping");

            let deployment = connector.spec.deployment.clone();
            let status = connector.status_mut();
            status.deployment = Some(deployment);
            status.phase = Some(ConnectorPhase::Stopping);
            status.connector_status.phase = STATE_DE_PROVISIONING.to_string();
            status.connector_status.conditions.clear();
        }
        DesiredState::Ready => {
            set_condition_bool(connector, ConditionType::Augmentation, true);
            set_condition_bool(connector, ConditionType::Ready, false);

            let identity = ctx.identity.clone();
            let status = connector.status_mut();
            status.connector_status.assigned_operator = Some(identity);
            status.phase = Some(ConnectorPhase::Augmentation);
            status.connector_status.phase = STATE_PROVISIONING.to_string();
            status.connector_status.conditions.clear();
        }
    }

    Ok(Outcome::UpdateStatus)
}

async fn handle_augmentation(connector: &mut ManagedConnector, ctx: &Context) -> Result<Outcome> {
    let Some(secret_name) = connector.spec.deployment.secret.clone() else {
        info!("deployment carries no secret reference, waiting for spec update");
        return Ok(Outcome::NoUpdate);
    };

    let namespace = namespace_of(connector)?;

    // 1. resolve the supporting secret
    let Some(secret) = ctx.kube.get_secret(&namespace, &secret_name).await? else {
        if has_condition(
            connector,
            ConditionType::Augmentation,
            ConditionStatus::False,
            "SecretNotFound",
        ) {
            // already recorded; silent retry
            return Ok(Outcome::RequeueAfter(RETRY_REQUEUE));
        }

        debug!(secret = %secret_name, "unable to find deployment secret");
        set_condition(
            connector,
            ConditionType::Augmentation,
            ConditionStatus::False,
            "SecretNotFound",
            format!("Unable to find secret with name: {secret_name}"),
        );
        set_condition(
            connector,
            ConditionType::Ready,
            ConditionStatus::False,
            "AugmentationError",
            "AugmentationError",
        );
        return Ok(Outcome::UpdateStatus);
    };

    // 2. correlate secret generation with spec generation
    let connector_uow = connector.spec.deployment.unit_of_work.clone();
    let secret_uow = secret
        .metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(LABEL_UOW))
        .cloned();

    if connector_uow != secret_uow {
        if has_condition(
            connector,
            ConditionType::Augmentation,
            ConditionStatus::False,
            "SecretUoWMismatch",
        ) {
            return Ok(Outcome::RequeueAfter(RETRY_REQUEUE));
        }

        debug!(?connector_uow, ?secret_uow, "secret and connector unit of work mismatch");
        set_condition(
            connector,
            ConditionType::Augmentation,
            ConditionStatus::False,
            "SecretUoWMismatch",
            format!(
                "Secret and connector unit of work mismatch (connector: {}, secret: {})",
                connector_uow.as_deref().unwrap_or("<none>"),
                secret_uow.as_deref().unwrap_or("<none>"),
            ),
        );
        set_condition(
            connector,
            ConditionType::Ready,
            ConditionStatus::False,
            "AugmentationError",
            "AugmentationError",
        );
        return Ok(Outcome::UpdateStatus);
    }

    // 3. ensure the supporting config record exists
    let config_map_name = resources::config_map_name(&connector.spec.deployment_id);
    let config_map = match ctx.kube.get_config_map(&namespace, &config_map_name).await? {
        Some(existing) => existing,
        None => {
            info!(
                config_map = %config_map_name,
                deployment = %connector.spec.deployment_id,
                "config record not found, creating"
            );
            let created = new_config_map(connector, &config_map_name, &namespace, &ctx.identity)?;
            ctx.kube.create_config_map(&created).await?;
            created
        }
    };

    // 4. reify: all artifacts or nothing
    let artifacts = match ctx.operand.reify(connector, &secret, &config_map).await {
        Ok(artifacts) => artifacts,
        Err(e) => {
            warn!(
                error = %e,
                deployment = %connector.spec.deployment_id,
                "error reifying deployment"
            );

            set_condition(
                connector,
                ConditionType::Augmentation,
                ConditionStatus::False,
                "ReifyFailed",
                e.to_string(),
            );
            set_condition(
                connector,
                ConditionType::Stopping,
                ConditionStatus::True,
                "Stopping",
                "Stopping",
            );

            let deployment = connector.spec.deployment.clone();
            let status = connector.status_mut();
            status.deployment = Some(deployment);
            status.phase = Some(ConnectorPhase::Stopping);
            status.connector_status.phase = STATE_FAILED.to_string();
            status.connector_status.conditions.clear();

            return Ok(Outcome::UpdateStatus);
        }
    };

    // 5. stamp and apply every artifact
    for mut artifact in artifacts {
        resources::stamp_artifact(
            &mut artifact,
            connector,
            &ctx.identity.id,
            &ctx.identity.type_,
            &ctx.target_labels,
            &ctx.target_annotations,
        )?;
        ctx.kube.apply_artifact(&namespace, &artifact).await?;

        debug!(
            kind = ?artifact.types.as_ref().map(|t| t.kind.clone()),
            name = %artifact.name_any(),
            "artifact applied"
        );
    }

    // 6. commit: this descriptor has now been fully acted upon
    let deployment = connector.spec.deployment.clone();
    let status = connector.status_mut();
    status.deployment = Some(deployment);
    status.phase = Some(ConnectorPhase::Monitor);
    status.connector_status.conditions.clear();

    set_condition_bool(connector, ConditionType::Resync, false);
    set_condition_bool(connector, ConditionType::Monitor, true);
    set_condition_bool(connector, ConditionType::Ready, true);
    set_condition_bool(connector, ConditionType::Augmentation, true);

    Ok(Outcome::UpdateStatus)
}

async fn handle_monitor(connector: &mut ManagedConnector, ctx: &Context) -> Result<Outcome> {
    if let Some(outcome) = check_drift(connector) {
        return Ok(outcome);
    }

    ctx.operand.status(connector).await?;

    // search for newly registered operators offering a better match
    let selector = connector.spec.operator_selector.clone();
    let operators = ctx.kube.list_operators(&ctx.namespace).await?;
    let selected = selection::available(&selector, &operators);

    let status = connector.status_mut();

    // advertise a better match; the assigned operator itself is never
    // advertised, and a stale advertisement is withdrawn
    let advertised = match selected {
        Some(candidate)
            if Some(&candidate) != status.connector_status.assigned_operator.as_ref() =>
        {
            Some(candidate)
        }
        _ => None,
    };

    if advertised != status.connector_status.available_operator {
        match &advertised {
            Some(op) => info!(operator = %op, "better matching operator available"),
            None => debug!("no better matching operator, clearing advertisement"),
        }
        status.connector_status.available_operator = advertised;
    }

    Ok(Outcome::UpdateStatus)
}

async fn handle_deleting(connector: &mut ManagedConnector, ctx: &Context) -> Result<Outcome> {
    if !ctx.operand.delete(connector).await? {
        return Ok(Outcome::RequeueAfter(RETRY_REQUEUE));
    }

    let status = connector.status_mut();
    status.phase = Some(ConnectorPhase::Deleted);
    status.connector_status.phase = STATE_DELETED.to_string();
    status.connector_status.conditions.clear();

    set_condition_reason(connector, ConditionType::Deleting, false, "Deleted");
    set_condition_reason(connector, ConditionType::Deleted, true, "Deleted");

    info!("connector deleted");
    Ok(Outcome::UpdateStatus)
}

fn handle_deleted(connector: &mut ManagedConnector) -> Result<Outcome> {
    if let Some(outcome) = check_drift(connector) {
        return Ok(outcome);
    }
    Ok(Outcome::NoUpdate)
}

async fn handle_stopping(connector: &mut ManagedConnector, ctx: &Context) -> Result<Outcome> {
    if !ctx.operand.stop(connector).await? {
        return Ok(Outcome::RequeueAfter(RETRY_REQUEUE));
    }

    let status = connector.status_mut();
    status.phase = Some(ConnectorPhase::Stopped);
    status.connector_status.phase = STATE_STOPPED.to_string();
    status.connector_status.conditions.clear();

    set_condition_reason(connector, ConditionType::Stopping, false, "Stopped");
    set_condition_reason(connector, ConditionType::Stop, true, "Stopped");

    info!("connector stopped");
    Ok(Outcome::UpdateStatus)
}

fn handle_stopped(connector: &mut ManagedConnector) -> Result<Outcome> {
    if let Some(outcome) = check_drift(connector) {
        return Ok(outcome);
    }

    // if reification failed, the safest terminal is Error: the operand has
    // been torn down and the failure stays diagnosable
    if has_condition(
        connector,
        ConditionType::Augmentation,
        ConditionStatus::False,
        "ReifyFailed",
    ) {
        let status = connector.status_mut();
        status.phase = Some(ConnectorPhase::Error);
        status.connector_status.phase = STATE_FAILED.to_string();
        status.connector_status.conditions.clear();
        return Ok(Outcome::UpdateStatus);
    }

    Ok(Outcome::NoUpdate)
}

fn handle_error(connector: &mut ManagedConnector) -> Result<Outcome> {
    if let Some(outcome) = check_drift(connector) {
        return Ok(outcome);
    }
    Ok(Outcome::NoUpdate)
}

async fn handle_transferring(connector: &mut ManagedConnector, ctx: &Context) -> Result<Outcome> {
    if !ctx.operand.stop(connector).await? {
        return Ok(Outcome::RequeueAfter(RETRY_REQUEUE));
    }

    let status = connector.status_mut();
    status.phase = Some(ConnectorPhase::Transferred);
    status.connector_status.phase = STATE_STOPPED.to_string();
    status.connector_status.conditions.clear();

    info!("connector transferred");
    Ok(Outcome::UpdateStatus)
}

fn handle_transferred(connector: &mut ManagedConnector) -> Result<Outcome> {
    info!("connector released, it can now be claimed by another operator");

    let status = connector.status_mut();
    status.phase = Some(ConnectorPhase::Initialization);
    status.connector_status.assigned_operator = None;
    status.connector_status.available_operator = None;

    Ok(Outcome::UpdateStatus)
}

// **************************************************
//
// Helpers
//
// **************************************************

/// Run the drift detector ahead of a status-bearing phase handler.
///
/// Returns the redirect outcome when the desired descriptor diverged from
/// the last-acted-upon one; `None` lets the normal handler proceed.
fn check_drift(connector: &mut ManagedConnector) -> Option<Outcome> {
    use crate::crd::DesiredState;

    let desired = connector.spec.deployment.clone();
    let acted = connector.status.as_ref().and_then(|s| s.deployment.clone());

    match classify(&desired, acted.as_ref()) {
        DriftKind::NoDrift => None,
        DriftKind::Resync => {
            set_condition_reason(connector, ConditionType::Resync, true, "Resync");

            match desired.desired_state {
                DesiredState::Stopped => {
                    set_condition_reason(connector, ConditionType::Stopping, true, "Stopping");
                    let status = connector.status_mut();
                    status.phase = Some(ConnectorPhase::Stopping);
                    status.deployment = Some(desired);
                }
                DesiredState::Unassigned | DesiredState::Deleted => {
                    set_condition_reason(connector, ConditionType::Deleting, true, "Deleting");
                    let status = connector.status_mut();
                    status.phase = Some(ConnectorPhase::Deleting);
                    status.deployment = Some(desired);
                }
                DesiredState::Ready => {
                    // a resync is a technical phase: re-run augmentation
                    // without disturbing the externally visible operand state
                    set_condition_reason(connector, ConditionType::Augmentation, true, "Resync");
                    set_condition_reason(connector, ConditionType::Ready, false, "Resync");
                    connector.status_mut().phase = Some(ConnectorPhase::Augmentation);
                }
            }

            info!(
                deployment = %connector.spec.deployment_id,
                phase = ?connector.phase(),
                "resync detected on connector deployment"
            );
            Some(Outcome::UpdateStatus)
        }
        DriftKind::Drift => {
            let status = connector.status_mut();
            status.phase = Some(ConnectorPhase::Initialization);
            status.connector_status.phase = STATE_PROVISIONING.to_string();
            status.connector_status.conditions.clear();

            info!(
                deployment = %connector.spec.deployment_id,
                "drift detected on connector deployment, re-initializing"
            );
            Some(Outcome::UpdateStatus)
        }
    }
}

fn new_config_map(
    connector: &ManagedConnector,
    name: &str,
    namespace: &str,
    identity: &Operator,
) -> Result<ConfigMap> {
    let spec = &connector.spec;

    let mut config_map = ConfigMap::default();
    config_map.metadata.name = Some(name.to_string());
    config_map.metadata.namespace = Some(namespace.to_string());
    config_map.metadata.labels = Some(BTreeMap::from([
        (LABEL_CLUSTER_ID.to_string(), spec.cluster_id.clone()),
        (LABEL_CONNECTOR_ID.to_string(), spec.connector_id.clone()),
        (LABEL_DEPLOYMENT_ID.to_string(), spec.deployment_id.clone()),
        (LABEL_OPERATOR_TYPE.to_string(), identity.type_.clone()),
    ]));
    config_map.metadata.owner_references = Some(vec![resources::owner_reference(connector)?]);

    Ok(config_map)
}

fn is_selected(connector: &ManagedConnector, identity: &Operator) -> bool {
    connector.spec.operator_selector.id.as_deref() == Some(identity.id.as_str())
}

fn is_assigned(connector: &ManagedConnector, identity: &Operator) -> bool {
    connector
        .assigned_operator()
        .map(|op| op.id == identity.id)
        .unwrap_or(false)
}

fn is_resync(connector: &ManagedConnector) -> bool {
    has_condition(
        connector,
        ConditionType::Resync,
        ConditionStatus::True,
        "Resync",
    )
}

fn namespace_of(connector: &ManagedConnector) -> Result<String> {
    connector
        .namespace()
        .ok_or_else(|| Error::validation("connector has no namespace"))
}
