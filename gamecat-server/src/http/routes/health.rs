//! Health check endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: String,
}

/// GET / - never touches the database
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: format!("Server is running with tag {}", state.tag),
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health))
}
