//! mvc-router server.
//!
//! ```text
//!                ┌──────────────────────────────────────────────┐
//!   Request      │  http::server ──▶ routing::Router            │
//!   ────────────▶│  (layers,         (match, resolve $refs,     │
//!                │   params)          clean arguments)          │
//!                │                        │                     │
//!                │                        ▼                     │
//!   Response     │  http::response ◀── controller               │
//!   ◀────────────│                    (before → x_do → after)   │
//!                │                        │                     │
//!                │                  db / view services          │
//!                └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use mvc_router::app;
use mvc_router::config::{load_config, AppConfig, ConfigWatcher};
use mvc_router::http::HttpServer;
use mvc_router::lifecycle::{drain, spawn_signal_listener, Services, Shutdown};
use mvc_router::observability::{logging, metrics};
use mvc_router::routing::Router;

#[derive(Parser)]
#[command(name = "mvc-router")]
#[command(about = "Serve the bundled MVC application", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("mvc-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let services = Services::start(&config).await?;
    app::prepare(&services).await?;
    let controllers = app::controllers(&services);
    tracing::info!(controllers = ?controllers.names(), "Controllers ready");

    let routes = Router::from_config(&config.routes)?;

    // Keep the watcher alive for the lifetime of the server.
    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let grace = Duration::from_secs(config.timeouts.shutdown_grace_secs);
    let server = HttpServer::new(config, routes, controllers);
    let mut serving = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    let mut stop = shutdown.subscribe();
    let finished = tokio::select! {
        result = &mut serving => Some(result),
        _ = stop.recv() => None,
    };
    match finished {
        Some(result) => result??,
        None => {
            if !drain(&mut serving, grace).await {
                serving.abort();
            }
        }
    }

    services.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
