//! Process-wide operator configuration
//!
//! The operator's own identity (id/type/version) and the admin-configured
//! label/annotation copy-through lists are read once at startup and injected
//! into the engine as immutable values.

use clap::Parser;

use crate::crd::Operator;

/// Operator runtime configuration
#[derive(Parser, Clone, Debug)]
pub struct OperatorConfig {
    /// Unique id of this operator instance
    #[arg(long, env = "TETHER_OPERATOR_ID")]
    pub operator_id: String,

    /// Operator family type (must match the selectors of connectors it serves)
    #[arg(long, env = "TETHER_OPERATOR_TYPE")]
    pub operator_type: String,

    /// Version of this operator instance
    #[arg(long, env = "TETHER_OPERATOR_VERSION")]
    pub operator_version: String,

    /// Namespace holding connector, secret, and operator records
    #[arg(long, env = "TETHER_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Connector labels copied onto every reified artifact
    #[arg(long, env = "TETHER_TARGET_LABELS", value_delimiter = ',')]
    pub target_labels: Vec<String>,

    /// Connector annotations copied onto every reified artifact
    #[arg(long, env = "TETHER_TARGET_ANNOTATIONS", value_delimiter = ',')]
    pub target_annotations: Vec<String>,

    /// Listen address for the Prometheus metrics exporter; disabled when unset
    #[arg(long, env = "TETHER_METRICS_ADDR")]
    pub metrics_addr: Option<std::net::SocketAddr>,
}

impl OperatorConfig {
    /// This operator's identity as advertised to connectors
    pub fn identity(&self) -> Operator {
        Operator::new(
            &self.operator_id,
            &self.operator_type,
            &self.operator_version,
        )
    }
}
