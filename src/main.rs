//! Alias-keyed round-robin reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 ALIAS PROXY                   │
//!                    │                                               │
//!  Client Request    │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!  ──────────────────┼─▶│   http   │──▶│ dispatch │──▶│ resolver │  │
//!  /alias/rest...    │  │  server  │   │          │   │          │  │
//!                    │  └──────────┘   └────┬─────┘   └──────────┘  │
//!                    │                      │                        │
//!                    │                      ▼                        │
//!                    │                ┌──────────┐                   │
//!                    │                │ balance  │                   │
//!                    │                │ rotation │                   │
//!                    │                └────┬─────┘                   │
//!                    │                     │                         │
//!  Client Response   │  ┌──────────┐      ▼                         │
//!  ◀─────────────────┼──│ response │◀─ transport ◀──────────────────┼── Backend
//!                    │  └──────────┘  (hyper client, 1 retry)       │   Server
//!                    │                                               │
//!                    │  Cross-cutting: config, security (rate        │
//!                    │  limit), observability, lifecycle             │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use alias_proxy::config::{load_config, ProxyConfig};
use alias_proxy::http::HttpServer;
use alias_proxy::lifecycle::Shutdown;
use alias_proxy::observability;

#[derive(Parser)]
#[command(name = "alias-proxy")]
#[command(about = "Alias-keyed round-robin reverse proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let cli = Cli::parse();

    tracing::info!("alias-proxy v0.1.0 starting");

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            tracing::warn!("No config file given, using defaults");
            ProxyConfig::default()
        }
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        aliases = config.aliases.len(),
        resolver_mode = ?config.resolver.mode,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
