//! Service endpoints outside the OpenAI surface.

use axum::{http::header, response::IntoResponse, Json};
use serde_json::json;

use crate::proxy::prometheus::render_metrics;

/// Any unrouted path answers with the service banner.
pub async fn handle_liveness() -> impl IntoResponse {
    Json(json!({
        "status": "You2Api Service Running...",
        "message": "MoLoveSze..."
    }))
}

pub async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn handle_metrics() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], render_metrics())
}
