//! Gateway block page service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Gateway redirect        ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http::server ──▶ http::request             │
//!                             │        │              (context, Accept)      │
//!                             │        ▼                                     │
//!                             │    resolver ──▶ cache (rule:<id>, TTL)       │
//!                             │        │                                     │
//!                             │        └─────▶ upstream client ──────────────┼──▶ Gateway API
//!                             │                (retry + backoff)             │
//!                             │        ▼                                     │
//!     Block page / JSON       │  http::response ◀── page (escaped HTML)      │
//!     ◀───────────────────────┼── security (CSP nonce, CORS allow-list)      │
//!                             └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use gateway_block_page::cache::MemoryStore;
use gateway_block_page::config::load_config_with;
use gateway_block_page::error::ServerError;
use gateway_block_page::lifecycle::{signals, Shutdown};
use gateway_block_page::observability::{logging, metrics};
use gateway_block_page::BlockPageServer;

#[derive(Parser)]
#[command(name = "block-page")]
#[command(about = "Custom access-blocked page for a network security gateway", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "BLOCK_PAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {}", e);
        }
    }

    let config = load_config_with(cli.config.as_deref(), |config| {
        if let Some(bind) = cli.bind {
            config.listener.bind_address = bind;
        }
    })?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "block-page starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        credentials = config.upstream.credentials().is_some(),
        cache_ttl_secs = config.cache.ttl_secs,
        max_retries = config.retries.max_retries,
        allowed_origins = config.cors.allowed_origins.len(),
        "Configuration loaded"
    );

    if cli.check {
        tracing::info!("Configuration valid");
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let store = MemoryStore::new();
    let _sweeper = store.spawn_sweeper(config.cache.sweep_interval());

    let server = BlockPageServer::with_store(config, Arc::new(store))?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
