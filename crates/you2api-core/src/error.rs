//! Unified error type for the translation pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Every failure a chat-completion request can end in.
///
/// Nothing here is retried; each variant maps to exactly one HTTP status.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BridgeError {
    /// Bearer credential absent or malformed.
    #[error("Missing or invalid authorization header")]
    MissingCredential,

    /// Body could not be decoded, or carried no messages.
    #[error("{0}")]
    InvalidRequest(String),

    /// Transport failure talking to upstream.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Staging an upload artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Upstream answered with a body we could not decode.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Nonce handshake before an upload failed.
    #[error("Nonce request failed: {0}")]
    Nonce(String),

    /// File upload rejected by upstream.
    #[error("File upload failed with status {status}: {body}")]
    Upload {
        /// HTTP status returned by the upload endpoint
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Search endpoint answered with a non-success status.
    #[error("API returned status {status}")]
    UpstreamStatus {
        /// HTTP status returned by upstream, relayed verbatim
        status: u16,
        /// Response body, logged but never relayed
        body: String,
    },

    /// Non-streaming call exceeded its deadline.
    #[error("Upstream request timed out after {0}s")]
    Timeout(u64),

    /// Token estimate not representable.
    #[error("Token estimate out of range: {0}")]
    TokenCount(f64),

    /// Startup configuration rejected while wiring the router.
    #[error(transparent)]
    Config(#[from] you2api_types::ConfigError),
}

/// Result alias for pipeline operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            },
            Self::Network(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Nonce(_)
            | Self::Upload { .. }
            | Self::Timeout(_)
            | Self::TokenCount(_)
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("[Bridge] Request failed ({}): {}", status.as_u16(), self);
        } else {
            tracing::debug!("[Bridge] Request rejected ({}): {}", status.as_u16(), self);
        }
        (status, self.to_string()).into_response()
    }
}
