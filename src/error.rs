use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;

pub const MISSING_DELETE_ID: &str = "Missing movie ID in path";
pub const MISSING_GET_ID: &str = "Missing movieId in path";
pub const INVALID_GET_ID: &str = "Invalid movieId. Must be a number.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Movie not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            },
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": self.to_string() }))).into_response()
            },
            AppError::Store(err) => {
                // Store details stay in the log.
                tracing::error!(error = %err, "store request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Internal server error" })))
                    .into_response()
            },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
