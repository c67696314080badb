//! Oddsline Server
//!
//! Sportsbook backend: fixtures and odds, bet placement, wallet
//! transactions and a live odds push socket.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Oddsline - sportsbook API server
#[derive(Parser, Debug)]
#[command(name = "oddsline-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "ODDSLINE_CONFIG", default_value = "./oddsline-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting oddsline-server v{}", env!("CARGO_PKG_VERSION"));

    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    let odds_buffer = loaded_config.server.odds_buffer;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let (shared_config, seed) = loaded_config.into_shared();
    let ledger = seed.into_ledger().map_err(|e| {
        tracing::error!("Failed to seed ledger: {}", e);
        e
    })?;
    tracing::info!(
        fixtures = ledger.fixture_count(),
        accounts = ledger.account_count(),
        "Ledger seeded"
    );

    let state = AppState::new(shared_config, ledger, odds_buffer);

    // Spawn config reload handler (listens for SIGHUP)
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reload_handle = spawn_config_reload_handler(state.clone(), config_loader, shutdown_rx);

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = reload_handle.await {
        tracing::warn!(error = %e, "Config reload handler did not stop cleanly");
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Set `ODDSLINE_LOG_FORMAT=json` for one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,oddsline_core=debug"));

    let json = std::env::var("ODDSLINE_LOG_FORMAT").is_ok_and(|format| format == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
