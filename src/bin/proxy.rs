//! SUITER same-origin proxy
//!
//! Forwards `/api/*` to `BACKEND_API_URL` and serves `STATIC_DIR` for
//! everything else.

use std::path::PathBuf;

use suiter::{error::Result, models::Config, proxy};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the proxy server.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var("SUITER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));
    let config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    }
    .apply_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("SUITER proxy starting...");
    if let Err(e) = config.validate() {
        error!("Config validation failed: {e}");
        return Err(e);
    }

    proxy::serve(&config).await
}
