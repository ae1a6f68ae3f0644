//! Proxy module - OpenAI-compatible bridge service
//!
//! This module provides the HTTP surface and the translation pipeline:
//! - OpenAI ChatCompletions and Models endpoints
//! - History folding and file externalization for long context
//! - SSE re-framing of the upstream token stream
//! - Optional `/proxy/*` passthrough and Prometheus metrics

pub mod common;
pub mod handlers;
pub mod mappers;
pub mod middleware;
pub mod passthrough;
pub mod prometheus;
pub mod server;
pub mod upstream;

pub use server::{build_app_router, build_proxy_router, AppState, AxumServer};
pub use upstream::{ByteStream, YouChatApi, YouChatClient};

#[cfg(test)]
pub mod tests;
