//! Optional reverse proxy: `/proxy/<rest>` is forwarded to `<proxy_url>/<rest>`.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use you2api_types::models::PassthroughConfig;
use you2api_types::ConfigError;

use crate::error::{BridgeError, BridgeResult};
use crate::proxy::common::client_builder::build_http_client;

const PROXY_PREFIX: &str = "/proxy";

const MAX_FORWARD_BODY: usize = 32 * 1024 * 1024;

const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn skip_request_header(name: &str) -> bool {
    name == "host" || name == "content-length" || HOP_BY_HOP_HEADERS.contains(&name)
}

fn skip_response_header(name: &str) -> bool {
    name == "content-length" || HOP_BY_HOP_HEADERS.contains(&name)
}

fn filter_headers(headers: &HeaderMap, skip: fn(&str) -> bool) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !skip(name.as_str()) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}

#[derive(Clone)]
pub struct PassthroughState {
    client: reqwest::Client,
    target: Url,
    timeout: Duration,
}

impl PassthroughState {
    pub fn new(config: &PassthroughConfig) -> BridgeResult<Self> {
        let target = Url::parse(config.proxy_url.trim()).map_err(|e| {
            ConfigError::ValidationError {
                field: "proxy.proxy_url".to_string(),
                message: e.to_string(),
            }
        })?;
        let client = build_http_client(None, None)?;
        Ok(Self { client, target, timeout: Duration::from_millis(config.proxy_timeout_ms) })
    }

    /// Join the target path with `path` (prefix already stripped) and merge queries.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.target.clone();
        let joined = format!(
            "{}/{}",
            self.target.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);

        let query = match (self.target.query(), query) {
            (Some(base), Some(extra)) if !base.is_empty() && !extra.is_empty() => {
                Some(format!("{}&{}", base, extra))
            },
            (Some(base), _) if !base.is_empty() => Some(base.to_string()),
            (_, Some(extra)) if !extra.is_empty() => Some(extra.to_string()),
            _ => None,
        };
        url.set_query(query.as_deref());
        url
    }

    async fn forward(&self, request: Request) -> BridgeResult<Response> {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path();
        let url = self.target_url(path.strip_prefix(PROXY_PREFIX).unwrap_or(path), parts.uri.query());

        let body = axum::body::to_bytes(body, MAX_FORWARD_BODY)
            .await
            .map_err(|e| BridgeError::InvalidRequest(format!("Unreadable request body: {}", e)))?;

        debug!("[Passthrough] {} {} -> {}", parts.method, path, url);
        let send = self
            .client
            .request(parts.method, url)
            .headers(filter_headers(&parts.headers, skip_request_header))
            .body(body)
            .send();

        let upstream = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| BridgeError::Timeout(self.timeout.as_secs()))??;

        let status = upstream.status();
        let headers = filter_headers(upstream.headers(), skip_response_header);
        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

pub async fn handle_passthrough(
    State(state): State<PassthroughState>,
    request: Request,
) -> Response {
    match state.forward(request).await {
        Ok(response) => response,
        Err(BridgeError::InvalidRequest(message)) => {
            (StatusCode::BAD_REQUEST, message).into_response()
        },
        Err(e) => {
            warn!("[Passthrough] Forwarding failed: {}", e);
            (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
        },
    }
}

/// Routes for `/proxy` and everything below it.
pub fn build_passthrough_router(config: &PassthroughConfig) -> BridgeResult<Router> {
    let state = PassthroughState::new(config)?;
    info!("[Passthrough] Forwarding {}/* to {}", PROXY_PREFIX, state.target);

    Ok(Router::new()
        .route(PROXY_PREFIX, any(handle_passthrough))
        .route("/proxy/", any(handle_passthrough))
        .route("/proxy/*path", any(handle_passthrough))
        .with_state(state))
}
