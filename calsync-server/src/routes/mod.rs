pub mod events;
pub mod meta;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use calsync_core::CalSyncError;

/// Standard API error response.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 403 body carrying both sides of the permission check.
#[derive(Serialize)]
pub struct ForbiddenResponse {
    pub error: String,
    pub required: Vec<String>,
    pub has: Vec<String>,
}

/// Core errors mapped to HTTP status codes.
pub enum ApiError {
    Unauthorized(String),
    Forbidden {
        required: Vec<String>,
        has: Vec<String>,
    },
    NotFound(String),
    Internal(String),
}

impl From<CalSyncError> for ApiError {
    fn from(err: CalSyncError) -> Self {
        match err {
            CalSyncError::MissingToken | CalSyncError::UnknownToken => {
                ApiError::Unauthorized(err.to_string())
            }
            CalSyncError::Forbidden { required, has } => ApiError::Forbidden { required, has },
            CalSyncError::EventNotFound(_) => ApiError::NotFound(err.to_string()),
            CalSyncError::Persistence(_) | CalSyncError::Io(_) | CalSyncError::Json(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(error) => {
                (StatusCode::UNAUTHORIZED, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Forbidden { required, has } => (
                StatusCode::FORBIDDEN,
                Json(ForbiddenResponse {
                    error: "Insufficient permissions".to_string(),
                    required,
                    has,
                }),
            )
                .into_response(),
            ApiError::NotFound(error) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Internal(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error })).into_response()
            }
        }
    }
}
