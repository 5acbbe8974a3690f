// src/models/sanitize.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Body for the string-in, string-out endpoints (`strip`, `tag`).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TextRequest {
    #[validate(length(max = 100000))]
    pub text: String,
}

/// Body for the structure endpoints (`escape`, `unescape`, `assert-escaped`).
/// `data` may be any JSON value; only its strings are rewritten.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StructureRequest {
    #[validate(custom(function = validate_data_size))]
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TextResponse {
    pub result: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StructureResponse {
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub escape_mode: String,
}

/// Limits the serialized structure to roughly 50KB.
fn validate_data_size(data: &serde_json::Value) -> Result<(), validator::ValidationError> {
    if data.to_string().len() > 50000 {
        return Err(validator::ValidationError::new("payload_too_large"));
    }
    Ok(())
}
