//! HTTP server layer
//!
//! Axum server with:
//! - CORS (permissive unless origins are configured)
//! - Request tracing
//! - Graceful shutdown
//! - Opaque JSON error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
