//! Edge gateway binary.
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!   Browser request       │                 EDGE GATEWAY                  │
//!   ──────────────────────┼─▶ OPTIONS? ──yes──▶ preflight (CORS only)     │
//!                         │      │ no                                     │
//!                         │      ▼                                        │
//!                         │  route table ──no match──▶ passthrough        │
//!                         │      │ rewritten path          (static / 404) │
//!                         │      ▼                               │        │
//!                         │  forwarder ───────────────────────────┼───────┼──▶ Backend
//!                         │      │ response / error               │       │
//!                         │      ▼                               ▼        │
//!   ◀─────────────────────┼── adapter (CORS + SSE overlays, 500 JSON)     │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::config::load_config;
use edge_gateway::lifecycle::{signals, startup, Shutdown};
use edge_gateway::observability::{logging, metrics};
use edge_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "CORS-aware edge proxy for a streaming API backend", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Load and validate the configuration, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_tracing(&config.observability);
    tracing::info!("edge-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    startup::log_summary(&config);

    if cli.check {
        GatewayServer::new(config)?;
        tracing::info!("Configuration OK");
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let server = GatewayServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
