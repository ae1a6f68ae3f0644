
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::path::Path;
use tracing::{debug, error, info};
use you2api_types::models::BridgeConfig;

use super::headers::{search_headers, session_headers};
use super::{ByteStream, YouChatApi};
use crate::error::{BridgeError, BridgeResult};
use crate::proxy::common::client_builder::build_http_client;
use crate::proxy::mappers::youchat::{UploadedFile, UpstreamRequestParams};

const NONCE_PATH: &str = "/api/get_nonce";
const UPLOAD_PATH: &str = "/api/upload";
const SEARCH_PATH: &str = "/api/streamingSearch";

/// `Host` header value for `base_url`, keeping a non-default port.
pub fn host_header(base_url: &str) -> Option<String> {
    let url = url::Url::parse(base_url).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// reqwest-backed [`YouChatApi`].
pub struct YouChatClient {
    http_client: Client,
    base_url: String,
    host: String,
}

impl YouChatClient {
    /// The client has no total timeout; the streaming search is unbounded and
    /// the non-streaming path bounds itself.
    pub fn new(config: &BridgeConfig) -> BridgeResult<Self> {
        let http_client = build_http_client(config.upstream_proxy_url.as_deref(), None)?;
        Ok(Self::with_client(http_client, &config.upstream_base_url))
    }

    pub fn with_client(http_client: Client, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let host = host_header(&base_url).unwrap_or_else(|| "you.com".to_string());
        Self { http_client, base_url, host }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl YouChatApi for YouChatClient {
    async fn fetch_nonce(&self, credential: &str) -> BridgeResult<String> {
        let response = self
            .http_client
            .get(self.url(NONCE_PATH))
            .headers(session_headers(credential)?)
            .send()
            .await
            .map_err(|e| BridgeError::Nonce(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| BridgeError::Nonce(e.to_string()))?;
        debug!("[YouChat-Upstream] Nonce response status {}", status);
        Ok(body.trim().to_string())
    }

    async fn upload_file(&self, credential: &str, path: &Path) -> BridgeResult<UploadedFile> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.txt".to_string());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.clone()));
        let response = self
            .http_client
            .post(self.url(UPLOAD_PATH))
            .headers(session_headers(credential)?)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("[YouChat-Upload] Upload of {} rejected with {}: {}", file_name, status, body);
            return Err(BridgeError::Upload { status: status.as_u16(), body });
        }

        let body = response.bytes().await?;
        let uploaded: UploadedFile = serde_json::from_slice(&body)?;
        Ok(uploaded)
    }

    async fn streaming_search(
        &self,
        credential: &str,
        params: &UpstreamRequestParams,
    ) -> BridgeResult<ByteStream> {
        info!(
            "[YouChat-Upstream] Search chat_id={} past_chat_length={} mode={}",
            params.chat_id,
            params.past_chat_length,
            params.selection.chat_mode()
        );

        let response = self
            .http_client
            .get(self.url(SEARCH_PATH))
            .query(&params.query_pairs())
            .headers(search_headers(credential, &self.host)?)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("[YouChat-Upstream] API returned status {}: {}", status.as_u16(), body);
            return Err(BridgeError::UpstreamStatus { status: status.as_u16(), body });
        }

        Ok(Box::pin(response.bytes_stream().map(|chunk| chunk.map_err(BridgeError::from))))
    }
}
