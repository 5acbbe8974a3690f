// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Failure raised by the sanitizer facade.
///
/// Only `assert_escaped` can fail; every other operation is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    /// A string at `path` differs from its own escaped form.
    NotEscaped { path: String },
}

impl fmt::Display for SanitizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizeError::NotEscaped { path } => {
                write!(f, "value at {} is not HTML-escaped", path)
            }
        }
    }
}

impl std::error::Error for SanitizeError {}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity, carries the offending location
    NotEscaped { path: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::NotEscaped { path } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": format!("value at {} is not HTML-escaped", path),
                    "path": path,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SanitizeError> for AppError {
    fn from(err: SanitizeError) -> Self {
        match err {
            SanitizeError::NotEscaped { path } => AppError::NotEscaped { path },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_error_maps_to_422() {
        let err: AppError = SanitizeError::NotEscaped { path: "$.a".into() }.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_bad_request_status() {
        let response = AppError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_every_variant_is_a_client_error() {
        let errors = [
            AppError::BadRequest("bad".into()),
            AppError::NotFound("missing".into()),
            AppError::NotEscaped { path: "$".into() },
        ];
        for err in errors {
            assert!(err.into_response().status().is_client_error());
        }
    }
}
