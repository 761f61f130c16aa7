use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bloc_catalogue_libs::store::collection::StoreError;
use bloc_catalogue_libs::CoreError;
use serde_json::json;
use thiserror::Error;

/// The HTTP-facing error taxonomy. Handlers never build status codes by
/// hand; they return one of these and the mapping lives in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("permission denied")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("unexpected error")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidInput(message) => ApiError::InvalidInput(message),
            CoreError::NotFound(what) => ApiError::NotFound(what),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Conflict(message) => ApiError::Conflict(message),
            other => ApiError::Internal(format!("{:?}", other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Internal(detail) = &self {
            tracing::error!("request failed cause: {}", detail);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
