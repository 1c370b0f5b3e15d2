//! Rustpredict Server - market direction classifier over HTTP
//!
//! Loads the model, scaler and metadata artifacts once at startup and serves
//! predictions and price decompositions until interrupted. Startup fails if
//! any artifact is missing.
//!
//! # Usage
//! ```sh
//! MODELS_BASE_DIR=/srv/predictor cargo run --bin server -- --port 8000
//! ```
//!
//! # Environment Variables
//! - `MODELS_BASE_DIR` / `MODELS_DIR` - Artifact locations (default: `./models`)
//! - `SERVER_BIND_ADDRESS` / `SERVER_PORT` - Listener (default: 127.0.0.1:8000)
//! - `PRICE_DATABASE_URL` or `PRICE_CSV_PATH` - Price history for `/stock/decomposition`

use anyhow::{Context, Result};
use clap::Parser;
use rustpredict::application::bootstrap::ServiceBootstrap;
use rustpredict::config::Config;
use rustpredict::interfaces::http;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind (overrides SERVER_BIND_ADDRESS)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the model artifacts (overrides MODELS_DIR)
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();

    info!("Rustpredict Server {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.bind_address = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(models_dir) = args.models_dir {
        config.artifacts.models_dir = models_dir;
    }
    info!(
        "Configuration loaded: models_dir={}, listen={}",
        config.artifacts.models_dir.display(),
        config.server.socket_address()
    );

    let services = ServiceBootstrap::init(&config).await?;
    let app = http::router(services);

    let address = config.server.socket_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received. Exiting...");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
