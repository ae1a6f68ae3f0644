// Middleware module - Axum middleware

pub mod auth;
pub mod cors;
pub mod monitor;

pub use auth::{auth_middleware, UpstreamCredential};
pub use cors::{allow_headers_layer, allow_methods_layer, cors_layer, options_short_circuit};
pub use monitor::metrics_middleware;
