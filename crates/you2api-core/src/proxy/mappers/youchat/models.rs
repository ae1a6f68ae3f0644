//! YouChat wire data models.

use serde::{Deserialize, Serialize};

/// One resolved question/answer turn in the `chat` query parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

impl HistoryEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.question.is_empty() && self.answer.is_empty()
    }
}

/// Provenance of content moved out of the query string into an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalizedSource {
    /// Always "user_file".
    pub source_type: String,
    pub filename: String,
    pub user_filename: String,
    /// Byte length of the content before plain-text filtering.
    pub size_bytes: usize,
}

impl ExternalizedSource {
    pub fn user_file(uploaded: UploadedFile, size_bytes: usize) -> Self {
        Self {
            source_type: "user_file".to_string(),
            filename: uploaded.filename,
            user_filename: uploaded.user_filename,
            size_bytes,
        }
    }
}

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub user_filename: String,
}

/// Payload of a `data:` line following `event: youChatToken`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct YouChatToken {
    #[serde(rename = "youChatToken")]
    pub token: String,
}
