//! HTTP server lifecycle.
//!
//! `serve` is the process entry: connect the store, then bind and serve
//! until Ctrl+C or SIGTERM. A store failure means the port is never
//! opened.
//!
//! `start_server_on` follows bind → spawn background task → return
//! handle with shutdown channel, for embedding and tests.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::http::header::InvalidHeaderValue;
use tokio::sync::oneshot;

use crate::api::middleware::cors::cors_layer;
use crate::api::router::app_router;
use crate::api::types::ApiContext;
use crate::config::Config;
use crate::db::{DatabaseError, DocumentStore};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Store unavailable: {0}")]
    Store(#[from] DatabaseError),

    #[error("Invalid allowed origin {origin:?}: {source}")]
    InvalidOrigin {
        origin: String,
        source: InvalidHeaderValue,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Handle to a server started with `start_server_on`.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServerHandle {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// The bound address, with the real port when started on port 0.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://<addr>` of the bound listener.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Run the server described by `config` until a shutdown signal.
pub async fn serve(config: &Config) -> Result<(), ServerError> {
    let store = DocumentStore::connect(config.store_uri.as_deref())?;
    let ctx = ApiContext::new(Arc::new(store));
    let cors = build_cors(&config.allowed_origin)?;
    let app = app_router(ctx, cors);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!(
        %addr,
        allowed_origin = %config.allowed_origin,
        "Server running on port {}",
        config.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Start a server on `addr` (port 0 for ephemeral) in a background task.
pub async fn start_server_on(
    ctx: ApiContext,
    allowed_origin: &str,
    addr: SocketAddr,
) -> Result<ServerHandle, ServerError> {
    let cors = build_cors(allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let addr = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?;

    let app = app_router(ctx, cors);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

fn build_cors(origin: &str) -> Result<tower_http::cors::CorsLayer, ServerError> {
    cors_layer(origin).map_err(|source| ServerError::InvalidOrigin {
        origin: origin.to_string(),
        source,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
