use clap::{Parser, Subcommand, ValueEnum};
use sriov_core::TOTAL_VFS_RESOURCE;
use sriov_extender::selector::{NETWORKS_ANNOTATION, SRIOV_NETWORK};
use sriov_extender::{
    Extender, ExtenderConfig, NetworkSelector, PromiseReaper, ReaperConfig,
    ResourceRequestSelector, Selector,
};
use sriov_server::{ApiServer, AppState, Config as ApiConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "sriov-scheduler",
    about = "Kubernetes scheduler extender that filters nodes by free SR-IOV VFs"
)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, env = "SRIOV_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the extender webhook
    Serve(ServeArgs),
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "SRIOV_BIND", default_value = "0.0.0.0:8888")]
    bind: String,
    /// Node allocatable entry holding the VF total
    #[arg(long, env = "SRIOV_RESOURCE_NAME", default_value = TOTAL_VFS_RESOURCE)]
    resource_name: String,
    /// How to decide whether a pod needs VFs
    #[arg(long, env = "SRIOV_SELECTOR", value_enum, default_value_t = SelectorKind::Network)]
    selector: SelectorKind,
    /// Pod annotation listing attached networks
    #[arg(long, env = "SRIOV_NETWORK_ANNOTATION", default_value = NETWORKS_ANNOTATION)]
    network_annotation: String,
    /// Network name that requires a VF
    #[arg(long, env = "SRIOV_NETWORK_NAME", default_value = SRIOV_NETWORK)]
    network_name: String,
    /// Extended resource a container must request (resource-request selector)
    #[arg(long, env = "SRIOV_REQUEST_RESOURCE", default_value = "intel.com/sriov")]
    request_resource: String,
    /// Seconds after which an unconsumed promise is dropped; promises never expire if unset
    #[arg(long, env = "SRIOV_PROMISE_TTL")]
    promise_ttl: Option<u64>,
    /// Seconds between promise purge passes
    #[arg(long, env = "SRIOV_REAP_INTERVAL", default_value_t = 15)]
    reap_interval: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SelectorKind {
    /// Pod annotation lists the SR-IOV network
    Network,
    /// A container requests the extended resource
    ResourceRequest,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
    }
}

/// Run the extender server, plus the promise reaper when a TTL is configured
async fn run_serve(args: ServeArgs) -> miette::Result<()> {
    info!("Starting SR-IOV scheduler extender");

    let listen_addr: std::net::SocketAddr = args
        .bind
        .parse()
        .map_err(|e| miette::miette!("Invalid bind address '{}': {}", args.bind, e))?;

    let selector = build_selector(&args);
    info!(
        "Using {}, capacity from allocatable '{}'",
        selector.name(),
        args.resource_name
    );

    let extender = Arc::new(Extender::with_selector(
        ExtenderConfig {
            resource_name: args.resource_name.clone(),
        },
        selector,
    ));

    let token = CancellationToken::new();

    // 1. Spawn the promise reaper
    let reaper_handle = match args.promise_ttl {
        Some(ttl) => {
            let reaper = PromiseReaper::new(
                extender.clone(),
                ReaperConfig {
                    promise_ttl: Duration::from_secs(ttl),
                    reap_interval: Duration::from_secs(args.reap_interval),
                },
            )
            .map_err(|e| miette::miette!("Invalid reaper configuration: {}", e))?;
            let reaper_token = token.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = reaper.run(reaper_token).await {
                    error!("Promise reaper error: {}", e);
                }
            }))
        }
        None => {
            warn!("No promise TTL configured, promises are never released");
            None
        }
    };

    // 2. Spawn the extender server
    let api_server = ApiServer::new(ApiConfig { listen_addr }, Arc::new(AppState::new(extender)));
    let api_token = token.clone();
    let api_handle = tokio::spawn(async move {
        tokio::select! {
            result = api_server.run() => {
                if let Err(e) = result {
                    error!("Extender server error: {}", e);
                }
            }
            _ = api_token.cancelled() => {
                info!("Extender server shutting down");
            }
        }
    });

    info!("All components started. Extender listening on {}", listen_addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| miette::miette!("Failed to listen for ctrl-c: {}", e))?;

    info!("Shutting down gracefully...");
    token.cancel();

    // Wait for all tasks to finish with a timeout
    let shutdown_timeout = Duration::from_secs(5);
    let _ = tokio::time::timeout(shutdown_timeout, async {
        let _ = api_handle.await;
        if let Some(handle) = reaper_handle {
            let _ = handle.await;
        }
    })
    .await;

    info!("Shutdown complete");

    Ok(())
}

fn build_selector(args: &ServeArgs) -> Box<dyn Selector> {
    match args.selector {
        SelectorKind::Network => Box::new(NetworkSelector::new(
            args.network_annotation.clone(),
            args.network_name.clone(),
        )),
        SelectorKind::ResourceRequest => {
            Box::new(ResourceRequestSelector::new(args.request_resource.clone()))
        }
    }
}
