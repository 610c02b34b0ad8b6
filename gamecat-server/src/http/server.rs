//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS by default, or an explicit origin list
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::Catalog;

/// Tag reported by the health check when none is configured
pub const DEFAULT_TAG: &str = "";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Build/version tag surfaced by `GET /`
    pub tag: String,

    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            tag: DEFAULT_TAG.to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub tag: String,
}

impl AppState {
    pub fn new(catalog: Catalog, tag: impl Into<String>) -> Self {
        Self {
            catalog,
            tag: tag.into(),
        }
    }
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::games::router())
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "CORS: ignoring invalid origin");
                None
            }
        })
        .collect();

    tracing::info!(count = allowed.len(), "CORS: restricting to configured origins");
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// The catalog must already be initialized; this only binds and serves.
///
/// # Example
///
/// ```ignore
/// let db = Arc::new(ConnectionManager::postgres(settings));
/// initialize_catalog(&db).await?;
/// run_server(Catalog::new(db), ServerConfig::default()).await?;
/// ```
pub async fn run_server(catalog: Catalog, config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState::new(catalog, config.tag.clone());
    let app = build_router(state, &config.cors_origins);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(tag = %config.tag, "Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
