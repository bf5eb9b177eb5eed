//! Fraction Assembler service
//!
//! Serves `POST /protocol/buy`, returning partially signed `buy_fraction`
//! bundles for the caller's wallet to complete and broadcast.

use anyhow::{Context, Result};
use clap::Parser;
use fraction_assembler::{
    buy_engine::BuyEngine,
    config::Config,
    endpoints::{self, AppState},
    rpc_manager::RpcPool,
    tx_builder::TxAssembler,
    wallet,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_logging(args.verbose, config.monitoring.json_logs)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting fraction assembler");

    // Missing or invalid fee payer is fatal
    let fee_payer = wallet::load_fee_payer(&config.wallet).context("Failed to load fee payer")?;
    let fee_payer = wallet::init_fee_payer(fee_payer)?;

    let pool = RpcPool::new(&config.rpc).context("Failed to initialize RPC pool")?;
    info!(
        endpoints = pool.endpoint_count(),
        commitment = %config.rpc.commitment,
        "RPC pool ready"
    );

    let assembler = TxAssembler::new(
        Arc::new(pool),
        config.rpc.commitment_config()?,
        Duration::from_millis(config.server.anchor_timeout_ms),
    );
    let engine = BuyEngine::new(fee_payer, assembler);
    let state = AppState::new(engine, config.monitoring.enable_metrics);

    endpoints::run_server(&config.bind_addr(), state, shutdown_signal()).await?;

    info!("Shut down gracefully");
    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let default_filter = if verbose {
        "fraction_assembler=debug,tower_http=debug,info"
    } else {
        "fraction_assembler=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };
    result.context("Failed to initialize logging")?;

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        dotenvy::dotenv().ok();
        // Logging is not up yet
        eprintln!("Config file '{}' not found, using defaults", path);
        Ok(Config::default())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
