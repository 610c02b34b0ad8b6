//! API error type with IntoResponse
//!
//! Storage failures never reach the client: they are logged and flattened
//! into one opaque 500 body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::{ConnectionError, DataError};

/// Body returned for every internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error type with HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Shared handle unavailable (500, logged)
    Connection(ConnectionError),

    /// Data-access call failed (500, logged)
    Data(DataError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Connection(e) => tracing::error!(error = %e, "Database connection unavailable"),
            Self::Data(e) => tracing::error!(error = %e, "Error fetching games"),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
        )
            .into_response()
    }
}

impl From<ConnectionError> for ApiError {
    fn from(e: ConnectionError) -> Self {
        Self::Connection(e)
    }
}

impl From<DataError> for ApiError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::Connection(e) => Self::Connection(e),
            e => Self::Data(e),
        }
    }
}
