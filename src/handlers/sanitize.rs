// src/handlers/sanitize.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::sanitize::{StructureRequest, StructureResponse, TextRequest, TextResponse},
    utils::html::HtmlCleaner,
};

/// Removes all markup from `text`.
#[utoipa::path(
    post,
    path = "/api/sanitize/strip",
    request_body = TextRequest,
    responses((status = 200, body = TextResponse), (status = 400, description = "Invalid payload"))
)]
pub async fn strip(
    State(cleaner): State<Arc<HtmlCleaner>>,
    Json(payload): Json<TextRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let result = cleaner.strip_tags(&payload.text);
    tracing::debug!(input_len = payload.text.len(), output_len = result.len(), "stripped tags");

    Ok(Json(TextResponse { result }))
}

/// Escapes `text` for use as a tag value.
#[utoipa::path(
    post,
    path = "/api/sanitize/tag",
    request_body = TextRequest,
    responses((status = 200, body = TextResponse), (status = 400, description = "Invalid payload"))
)]
pub async fn format_tag(
    State(cleaner): State<Arc<HtmlCleaner>>,
    Json(payload): Json<TextRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    Ok(Json(TextResponse {
        result: cleaner.format_as_tag(&payload.text),
    }))
}

/// Entity-escapes every string inside `data`.
#[utoipa::path(
    post,
    path = "/api/sanitize/escape",
    request_body = StructureRequest,
    responses((status = 200, body = StructureResponse), (status = 400, description = "Invalid payload"))
)]
pub async fn escape(
    State(cleaner): State<Arc<HtmlCleaner>>,
    Json(payload): Json<StructureRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    Ok(Json(StructureResponse {
        result: cleaner.escape_structure(payload.data),
    }))
}

/// Reverses `&amp;`, `&lt;` and `&gt;` inside `data`.
#[utoipa::path(
    post,
    path = "/api/sanitize/unescape",
    request_body = StructureRequest,
    responses((status = 200, body = StructureResponse), (status = 400, description = "Invalid payload"))
)]
pub async fn unescape(
    State(cleaner): State<Arc<HtmlCleaner>>,
    Json(payload): Json<StructureRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    Ok(Json(StructureResponse {
        result: cleaner.unescape_structure(payload.data),
    }))
}

/// Rejects `data` if any string in it still contains raw markup.
#[utoipa::path(
    post,
    path = "/api/sanitize/assert-escaped",
    request_body = StructureRequest,
    responses(
        (status = 200, body = StructureResponse),
        (status = 400, description = "Invalid payload"),
        (status = 422, description = "A string is not escaped; body names its path")
    )
)]
pub async fn assert_escaped(
    State(cleaner): State<Arc<HtmlCleaner>>,
    Json(payload): Json<StructureRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let result = cleaner.assert_escaped(payload.data)?;

    Ok(Json(StructureResponse { result }))
}
