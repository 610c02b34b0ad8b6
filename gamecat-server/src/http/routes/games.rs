//! Game listing endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::http::{ApiError, AppState};
use crate::models::GameView;

/// GET /games - every game with its category name
async fn list_games(State(state): State<Arc<AppState>>) -> Result<Json<Vec<GameView>>, ApiError> {
    let games = state.catalog.list_games().await?;
    tracing::debug!(count = games.len(), "Listed games");
    Ok(Json(games))
}

/// Game routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/games", get(list_games))
}
