//! dn-state-api - DN-Node host telemetry service
//!
//! Boots a node from its info file and serves host telemetry until SIGTERM
//! or SIGHUP.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dn_node::{DEFAULT_INFO_PATH, DEFAULT_PORT, Node, NodeConfig, termination_signal};
use dn_state_api::config::{DEFAULT_IP_LOOKUP_URL, DEFAULT_PROCESS_PATTERN};
use dn_state_api::{Providers, TelemetryConfig, TelemetryState, telemetry_routes};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_FILTER: &str = "dn_node=info,dn_state_api=info,tower_http=info";

#[derive(Parser)]
#[command(name = "dn-state-api")]
#[command(about = "DN-Node host telemetry service")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "DN_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Interface to bind
    #[arg(long, env = "DN_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Path to the info file
    #[arg(long, env = "DN_INFO_PATH", default_value = DEFAULT_INFO_PATH)]
    info: PathBuf,

    /// URL returning the public IP as `{"ip": "..."}`
    #[arg(long, env = "DN_IP_LOOKUP_URL", default_value = DEFAULT_IP_LOOKUP_URL)]
    ip_lookup_url: String,

    /// Substring selecting rows on /Nodes
    #[arg(long, default_value = DEFAULT_PROCESS_PATTERN)]
    process_pattern: String,

    /// Time limit for external programs, in seconds
    #[arg(long, default_value_t = 60)]
    command_timeout_secs: u64,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    if let Err(e) = run(cli).await {
        error!(error = %e, "dn-state-api failed");
        return Err(e);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let node_config = NodeConfig::new(cli.info)
        .with_bind_host(cli.bind)
        .with_port(cli.port);

    let telemetry_config = TelemetryConfig::default()
        .with_ip_lookup_url(cli.ip_lookup_url)
        .with_process_pattern(cli.process_pattern)
        .with_command_timeout(Duration::from_secs(cli.command_timeout_secs));
    telemetry_config.validate()?;

    info!(
        info = %node_config.info_path.display(),
        port = node_config.port,
        "starting dn-state-api"
    );

    let providers = Providers::system(&telemetry_config)?;
    let state = TelemetryState::new(telemetry_config, providers);

    let port = node_config.port;
    let node = Node::bootstrap(node_config).await?;
    let running = node.register(port, telemetry_routes(state)).await?;

    running.serve_with_shutdown(termination_signal()).await?;
    Ok(())
}
