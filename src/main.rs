//! Tether - connector lifecycle operator for fleet-managed deployments

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use kube::{Client, CustomResourceExt};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tether::config::OperatorConfig;
use tether::controller::Context;
use tether::crd::{ConnectorOperator, ManagedConnector};
use tether::operand::{MeteredOperand, NoopOperand};

/// Tether - Kubernetes operator managing connector deployment lifecycles
#[derive(Parser, Debug)]
#[command(name = "tether", version, about, long_about = None)]
struct Cli {
    /// Generate CRD manifests and exit
    #[arg(long)]
    crd: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the connector controller
    ///
    /// Watches ManagedConnector records in the configured namespace and
    /// reconciles each one through the phase state machine. The bundled
    /// binary runs a workload-free operand; embedding crates supply real
    /// operand implementations through the library API.
    Controller(OperatorConfig),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // kube's rustls-tls feature leaves provider selection to the binary
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        eprintln!("failed to install rustls crypto provider: {e:?}");
        std::process::exit(1);
    }

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.crd {
        let connector = serde_yaml::to_string(&ManagedConnector::crd())
            .map_err(|e| anyhow::anyhow!("failed to serialize CRD: {e}"))?;
        let operator = serde_yaml::to_string(&ConnectorOperator::crd())
            .map_err(|e| anyhow::anyhow!("failed to serialize CRD: {e}"))?;
        println!("{connector}---\n{operator}");
        return Ok(());
    }

    match cli.command {
        Some(Commands::Controller(config)) => run_controller(config).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

async fn run_controller(config: OperatorConfig) -> anyhow::Result<()> {
    if let Some(addr) = config.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .map_err(|e| anyhow::anyhow!("failed to start metrics exporter: {e}"))?;
        tracing::info!(%addr, "metrics exporter listening");
    }

    let client = Client::try_default().await?;

    let operand = Arc::new(MeteredOperand::new(NoopOperand, config.identity()));
    let ctx = Arc::new(Context::builder(client.clone(), operand, &config).build());

    tracing::info!(
        operator = %ctx.identity,
        namespace = %config.namespace,
        "starting tether"
    );

    tether::controller_runner::run(client, ctx).await?;
    Ok(())
}
