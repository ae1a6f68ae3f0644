//! Moving oversized content out of the query string into uploaded files.

use std::io;

use tempfile::TempDir;
use tracing::{debug, info};
use you2api_types::models::BridgeConfig;

use super::estimation::estimate_text_tokens;
use super::history::FoldedConversation;
use super::models::{ExternalizedSource, HistoryEntry};
use crate::error::BridgeResult;
use crate::proxy::common::random_id::generate_short_file_name;
use crate::proxy::prometheus;
use crate::proxy::upstream::YouChatApi;

/// Placeholder text that tells upstream to read the attached file.
pub const FILE_REFERENCE_PREFIX: &str = "查看这个文件并且直接与文件内容进行聊天：";

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Folded conversation after externalization, ready for the request builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalizedConversation {
    pub history: Vec<HistoryEntry>,
    pub current_turn: String,
    /// Uploads in discovery order: question before answer, history before current turn.
    pub sources: Vec<ExternalizedSource>,
}

/// Keep printable ASCII, CJK unified ideographs, CJK punctuation, `\n` and `\r`.
/// Anything else becomes a single space.
pub fn ensure_plain_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | ' '..='~' | '\u{4E00}'..='\u{9FA5}' | '\u{3000}'..='\u{303F}' => c,
            _ => ' ',
        })
        .collect()
}

/// Query text pointing at an uploaded file.
pub fn file_reference(user_filename: &str) -> String {
    let stem = user_filename.strip_suffix(".txt").unwrap_or(user_filename);
    format!("{FILE_REFERENCE_PREFIX}{stem}.txt")
}

/// Upload body: UTF-8 BOM followed by the filtered text.
pub fn upload_body(content: &str) -> Vec<u8> {
    let filtered = ensure_plain_text(content);
    let mut body = Vec::with_capacity(UTF8_BOM.len() + filtered.len());
    body.extend_from_slice(&UTF8_BOM);
    body.extend_from_slice(filtered.as_bytes());
    body
}

/// Applies the inline token budget to one request, uploading what does not fit.
pub struct ContentExternalizer<'a> {
    api: &'a dyn YouChatApi,
    credential: &'a str,
    config: &'a BridgeConfig,
}

impl<'a> ContentExternalizer<'a> {
    pub fn new(api: &'a dyn YouChatApi, credential: &'a str, config: &'a BridgeConfig) -> Self {
        Self { api, credential, config }
    }

    /// Uploads run strictly in discovery order; the first failure aborts the request.
    pub async fn externalize(
        &self,
        folded: FoldedConversation,
    ) -> BridgeResult<ExternalizedConversation> {
        let mut sources = Vec::new();
        let mut history = Vec::with_capacity(folded.history.len());

        for entry in folded.history {
            let question = self.history_field(entry.question, &mut sources).await?;
            let answer = self.history_field(entry.answer, &mut sources).await?;
            history.push(HistoryEntry { question, answer });
        }

        let current_turn = self
            .inline_or_upload(
                folded.current_turn.content,
                self.config.current_turn_inline_token_limit,
                &mut sources,
            )
            .await?;

        if !sources.is_empty() {
            info!("[YouChat-Upload] Externalized {} field(s) as files", sources.len());
        }

        Ok(ExternalizedConversation { history, current_turn, sources })
    }

    async fn history_field(
        &self,
        content: String,
        sources: &mut Vec<ExternalizedSource>,
    ) -> BridgeResult<String> {
        if !self.config.externalize_history {
            return Ok(content);
        }
        self.inline_or_upload(content, self.config.history_inline_token_limit, sources).await
    }

    async fn inline_or_upload(
        &self,
        content: String,
        limit: u32,
        sources: &mut Vec<ExternalizedSource>,
    ) -> BridgeResult<String> {
        if content.is_empty() {
            return Ok(content);
        }

        let tokens = estimate_text_tokens(&content, &self.config.token_weights)?;
        if tokens < limit {
            return Ok(content);
        }

        debug!("[YouChat-Upload] Field estimated at {} tokens (limit {}), uploading", tokens, limit);
        let source = self.upload(&content).await?;
        let reference = file_reference(&source.user_filename);
        sources.push(source);
        Ok(reference)
    }

    async fn upload(&self, content: &str) -> BridgeResult<ExternalizedSource> {
        // Upstream expects a nonce handshake before each upload.
        let _nonce = self.api.fetch_nonce(self.credential).await?;

        // Dropping the guard removes the artifact on every exit path.
        let staging = self.staging_dir()?;
        let path = staging.path().join(generate_short_file_name());
        tokio::fs::write(&path, upload_body(content)).await?;

        let uploaded = self.api.upload_file(self.credential, &path).await;
        prometheus::record_upload(uploaded.is_ok());
        let uploaded = uploaded?;
        debug!(
            "[YouChat-Upload] Uploaded {} as {} ({} bytes)",
            uploaded.user_filename,
            uploaded.filename,
            content.len()
        );

        Ok(ExternalizedSource::user_file(uploaded, content.len()))
    }

    fn staging_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("you2api-upload-");
        match &self.config.temp_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }
}
