//! Mini CRM Server
//!
//! Records deposit events into ClickHouse and writes a campaign log entry to
//! MongoDB for deposits that reach the bonus threshold.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use minicrm_core::config::ConfigStore;
use minicrm_core::framework::{AnalyticsStore, CampaignLogStore};
use minicrm_core::stores::{ClickHouseAnalytics, MongoCampaignLogs};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Mini CRM - deposit ingestion and campaign logging
#[derive(Parser, Debug)]
#[command(name = "minicrm-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "MINICRM_CONFIG", default_value = "./minicrm-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Create the ClickHouse table and MongoDB indexes on startup
    #[arg(long, default_value = "false")]
    init_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting minicrm-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Create store clients; both connect lazily
    let analytics = Arc::new(ClickHouseAnalytics::new(&loaded_config.clickhouse));
    let campaign_logs = Arc::new(
        MongoCampaignLogs::connect(&loaded_config.mongodb)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create MongoDB client: {}", e);
                e
            })?,
    );

    // Create schema if requested
    if args.init_schema {
        tracing::info!("Initializing store schema...");
        analytics.ensure_schema().await.map_err(|e| {
            tracing::error!("Failed to create ClickHouse table: {}", e);
            e
        })?;
        campaign_logs.ensure_schema().await.map_err(|e| {
            tracing::error!("Failed to create MongoDB indexes: {}", e);
            e
        })?;
        tracing::info!("Schema initialized successfully");
    }

    // Stores may come up after us, so an unreachable store is not fatal
    match analytics.ping().await {
        Ok(()) => tracing::info!(table = analytics.table(), "ClickHouse reachable"),
        Err(e) => tracing::warn!(error = %e, "ClickHouse not reachable yet"),
    }
    match campaign_logs.ping().await {
        Ok(()) => tracing::info!("MongoDB reachable"),
        Err(e) => tracing::warn!(error = %e, "MongoDB not reachable yet"),
    }

    // Create application state
    let campaign_rules = ConfigStore::new(loaded_config.campaign.clone());
    let state = AppState::new(analytics, campaign_logs, campaign_rules);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify =
        spawn_config_reload_handler(state.clone(), config_loader, loaded_config);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,minicrm_core=debug,minicrm_server=debug,mongodb=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
