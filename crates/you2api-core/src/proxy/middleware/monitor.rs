// Request metrics: one counter sample and one latency sample per response.
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::proxy::prometheus;

/// Unmatched paths share one label so arbitrary URLs cannot blow up cardinality.
const FALLBACK_ENDPOINT: &str = "fallback";

pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| FALLBACK_ENDPOINT.to_string(), |p| p.as_str().to_string());

    let response = next.run(request).await;
    let status = response.status().as_u16();
    prometheus::record_request(&method, &endpoint, status, start.elapsed());

    tracing::debug!(
        "[Metrics] {} {} -> {} in {}ms",
        method,
        endpoint,
        status,
        start.elapsed().as_millis()
    );
    response
}
