//! scrapbook-server binary
//!
//! Loads configuration from the environment (a `.env` file is honored),
//! wires the Postgres store provider and bucket uploader into the HTTP
//! server, and serves until Ctrl+C/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scrapbook_core::AppConfig;
use scrapbook_server::media::HttpMediaUploader;
use scrapbook_server::store::PgStoreProvider;
use scrapbook_server::{run_server, AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "scrapbook-server",
    version,
    about = "HTTP API for the scrapbook todo list"
)]
struct Cli {
    /// Bind address override (default: SCRAPBOOK_BIND or 127.0.0.1:3030)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Allow any CORS origin (overrides SCRAPBOOK_CORS_PERMISSIVE)
    #[arg(long)]
    cors_permissive: bool,
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing().ok();
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let uploader =
        HttpMediaUploader::new(config.media).context("failed to build media uploader")?;
    let state = AppState {
        store: Arc::new(PgStoreProvider::new(config.store)),
        uploader: Arc::new(uploader),
        page_size: config.http.page_size,
    };

    let server = ServerConfig {
        bind_addr: cli.bind.unwrap_or(config.http.bind_addr),
        cors_permissive: cli.cors_permissive || config.http.cors_permissive,
    };

    run_server(state, server).await.context("server failed")?;
    Ok(())
}
