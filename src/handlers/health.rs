// src/handlers/health.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{config::Config, error::AppError, models::sanitize::HealthResponse};

/// Liveness probe; also reports the active escape mode.
#[utoipa::path(get, path = "/api/health", responses((status = 200, body = HealthResponse)))]
pub async fn health(State(config): State<Config>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        escape_mode: config.escape_mode.to_string(),
    })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
