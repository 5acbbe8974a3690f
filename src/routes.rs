// src/routes.rs

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{
    handlers::{health, sanitize},
    models::sanitize::{
        HealthResponse, StructureRequest, StructureResponse, TextRequest, TextResponse,
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        sanitize::strip,
        sanitize::format_tag,
        sanitize::escape,
        sanitize::unescape,
        sanitize::assert_escaped,
    ),
    components(schemas(
        TextRequest,
        TextResponse,
        StructureRequest,
        StructureResponse,
        HealthResponse
    ))
)]
pub struct ApiDoc;

/// Assembles the main application router.
///
/// * Mounts the sanitize endpoints under `/api/sanitize`.
/// * Applies global middleware (Trace, CORS, body limit).
/// * Injects global state (shared cleaner + config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let sanitize_routes = Router::new()
        .route("/strip", post(sanitize::strip))
        .route("/tag", post(sanitize::format_tag))
        .route("/escape", post(sanitize::escape))
        .route("/unescape", post(sanitize::unescape))
        .route("/assert-escaped", post(sanitize::assert_escaped));

    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/sanitize", sanitize_routes)
        .fallback(health::not_found)
        // Global Middleware (applied from outside in)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(Config::default()))
    }

    #[tokio::test]
    async fn test_openapi_lists_sanitize_paths() {
        let response = app()
            .oneshot(Request::get("/api/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/api/sanitize/assert-escaped"].is_object());
        assert!(doc["paths"]["/api/health"].is_object());
    }

    #[tokio::test]
    async fn test_body_limit_enforced() {
        let config = Config {
            max_body_bytes: 64,
            ..Config::default()
        };
        let body = serde_json::json!({ "text": "x".repeat(200) }).to_string();

        let response = create_router(AppState::new(config))
            .oneshot(
                Request::post("/api/sanitize/strip")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
