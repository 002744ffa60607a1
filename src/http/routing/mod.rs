pub mod tasks;

use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, routing::get};
use chrono::{SecondsFormat, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::types::HealthResponse;

/// Mounts the task routes and the health check under `/api`.
pub fn app(router: Router) -> Router {
    Router::new().nest(
        "/api",
        Router::new().route("/health", get(health)).merge(router),
    )
}

/// Request tracing plus CORS for the browser origin.
pub fn with_layers(router: Router, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);
    router.layer(cors).layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
