// src/proxy/mod.rs

//! Same-origin server: forwards `/api/*` to the backend and optionally serves
//! a static directory (mock snapshots under `/mock`) for every other path.

mod forward;

use std::sync::Arc;

use axum::{Router, routing::any};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{error, info};

use crate::error::Result;
use crate::models::Config;
use crate::utils::http::create_async_client;

pub use forward::{ProxyError, forward};

/// Shared state of the forwarding handler.
#[derive(Debug, Clone)]
pub struct ProxyState {
    pub client: reqwest::Client,
    /// Base URL requests are forwarded to, without trailing slash
    pub backend_url: String,
}

impl ProxyState {
    pub fn new(client: reqwest::Client, backend_url: &str) -> Self {
        Self {
            client,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.api)?;
        Ok(Self::new(client, &config.proxy.backend_url))
    }
}

/// Build the proxy router. `static_dir` backs every non-API path.
pub fn router(state: ProxyState, static_dir: Option<&str>) -> Router {
    let mut app = Router::new().route("/api/*rest", any(forward));

    if let Some(dir) = static_dir {
        info!("Serving static files from {dir}");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Bind, serve, and return after a shutdown signal.
pub async fn serve(config: &Config) -> Result<()> {
    let state = ProxyState::from_config(config)?;
    info!("Forwarding /api/* to {}", state.backend_url);
    let app = router(state, config.proxy.static_dir.as_deref());

    let address = &config.proxy.bind;
    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Proxy running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
