//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shorthands_types::Error;

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, ApiError>;

/// Wrapper that turns a core [`Error`] into an HTTP response
///
/// The body shape is `{ "error": { "code", "message" } }`; the status code
/// comes from the error taxonomy (missing entities intentionally map to
/// 400, matching the client contract).
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// The `error` object inside an [`ErrorResponse`]
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            tracing::debug!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.0.error_code().to_string(),
                message: self.0.message().to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
