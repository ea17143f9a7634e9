//! API route definitions

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers, ServerConfig};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Not found",
            "data": null,
            "error": "Unknown endpoint. Available: POST /upload-info, POST /train-svr, GET /health",
        })),
    )
}

/// Create the application router
pub fn create_router(config: ServerConfig) -> Router {
    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .unwrap_or_else(|_| axum::http::HeaderValue::from_static("*")),
            )
            .allow_methods(Any)
            .allow_headers(Any),
        // Local-first default: allow all origins (machine-local use)
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    // Leave headroom above the documented cap so the size check in the
    // handler produces the structured PayloadTooLarge envelope instead of a
    // bare transport error.
    let body_limit = config.max_upload_size + 64 * 1024;

    Router::new()
        .route("/upload-info", post(handlers::upload_info))
        .route("/train-svr", post(handlers::train_svr))
        .route("/health", get(handlers::health))
        .fallback(handle_404)
        .with_state(Arc::new(config))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
