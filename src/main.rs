//! HTTP Dispatch Server
//!
//! Resolves every request to a handler method through an ordered rule table
//! or the path convention, then invokes it.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ ┌─────────────┐    ┌──────────────┐    ┌──────────────┐
//!                      │    http     │───▶│   routing    │───▶│   dispatch   │
//!                      │   server    │    │ table / conv │    │  + registry  │
//!     Client Response  │             │    └──────────────┘    └──────┬───────┘
//!     ◀─────────────── │             │◀──────── Reply ──────────────┘
//!                      └─────────────┘
//!
//!     Cross-cutting: config, observability (logs, metrics), lifecycle
//! ```
//!
//! A request whose route or handler is missing is served by the fallback
//! handler's `http404`; when that is unavailable too the answer is a 500.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use http_dispatch::config::load_config;
use http_dispatch::http::HttpServer;
use http_dispatch::lifecycle::{self, Shutdown};
use http_dispatch::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "http-dispatch")]
#[command(about = "HTTP request routing and dispatch server", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "dispatch.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "http-dispatch starting");
    tracing::info!(
        path = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        strategy = ?config.routing.strategy,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let routes = lifecycle::build_route_source(&config.routing)?;
    let dispatcher = lifecycle::build_dispatcher(&config.routing, lifecycle::default_registry());

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    lifecycle::spawn_signal_listener(shutdown);

    HttpServer::new(config, routes, dispatcher)
        .run(listener, signal)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
