use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::BridgeError;

/// The caller's bearer token. It is never validated locally; upstream
/// receives it as the `DS` session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCredential(pub String);

/// Token from `Authorization: Bearer <token>`, if present and non-empty.
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a bearer token before any upstream work happens.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, BridgeError> {
    let Some(credential) = bearer_credential(request.headers()).map(str::to_string) else {
        tracing::debug!("[Auth] Missing bearer token for {}", request.uri().path());
        return Err(BridgeError::MissingCredential);
    };

    request.extensions_mut().insert(UpstreamCredential(credential));
    Ok(next.run(request).await)
}
