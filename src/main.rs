//! Login gate server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request-id / trace / timeout layers
//!                         │
//!                         ▼
//!                   ┌──────────────┐   exempt path    ┌──────────────┐
//!                   │ login check  │ ───────────────▶ │   handlers   │
//!                   │              │   identity (ext) │              │
//!                   │              │ ───────────────▶ │  CurrentId   │
//!                   └──────┬───────┘                  └──────────────┘
//!                          │ neither
//!                          ▼
//!                {"code":0,"msg":"NOTLOGIN","data":null}
//!
//!     Cross-cutting: config (+ hot reload of exempt paths), sessions,
//!     observability, lifecycle
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use login_gate::config::loader::load_config;
use login_gate::config::watcher::ConfigWatcher;
use login_gate::error::ServerError;
use login_gate::observability::{logging, metrics};
use login_gate::{lifecycle, GateConfig, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "login-gate")]
#[command(about = "Session login check in front of the application routes", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Watched for exemption list changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("login-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        exempt_paths = ?config.login_check.exempt_paths,
        reject_status = config.login_check.reject_status,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        match address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = &config.listener.bind_address;
    let addr: SocketAddr = bind_address.parse().map_err(|source| ServerError::Address {
        address: bind_address.clone(),
        source,
    })?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(handle) => (Some(handle), updates),
                Err(e) => {
                    tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled");
                    (None, updates)
                }
            }
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::signals::wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config);
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
