//! Upstream module - client interface for the YouChat API

pub mod client;
pub mod headers;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;

use crate::error::BridgeResult;
use crate::proxy::mappers::youchat::{UpstreamRequestParams, UploadedFile};

pub use client::YouChatClient;

/// Raw upstream SSE body.
pub type ByteStream = Pin<Box<dyn Stream<Item = BridgeResult<Bytes>> + Send>>;

/// The three upstream calls the pipeline makes.
///
/// `credential` is the caller's bearer token, forwarded as the `DS` cookie.
#[async_trait]
pub trait YouChatApi: Send + Sync {
    /// `GET /api/get_nonce`. Required before every upload; the value is unused.
    async fn fetch_nonce(&self, credential: &str) -> BridgeResult<String>;

    /// `POST /api/upload` with the file at `path` as multipart field `file`.
    async fn upload_file(&self, credential: &str, path: &Path) -> BridgeResult<UploadedFile>;

    /// `GET /api/streamingSearch`. Non-success statuses are errors.
    async fn streaming_search(
        &self,
        credential: &str,
        params: &UpstreamRequestParams,
    ) -> BridgeResult<ByteStream>;
}
