//! OpenAI ChatCompletions API types.

use serde::{Deserialize, Deserializer, Serialize};

/// OpenAI message role.
///
/// Roles the bridge does not understand (`tool`, `function`, ...) land in
/// `Unknown` and are ignored by history folding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    #[serde(other)]
    Unknown,
}

/// OpenAI chat message with content flattened to text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default, deserialize_with = "flatten_content")]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

/// Content in an inbound message (string, null, or array of parts).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Text parts are joined with `\n`; images and other non-text parts are dropped.
fn flatten_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawContent>::deserialize(deserializer)?;
    Ok(match raw {
        None => String::new(),
        Some(RawContent::Text(text)) => text,
        Some(RawContent::Parts(parts)) => parts
            .into_iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text),
                ContentPart::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// OpenAI chat completion request.
///
/// Sampling parameters are accepted and ignored; upstream exposes no knobs
/// for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Public model identifier (e.g., "gpt-4o", "deepseek_r1"). Absent maps to the default model.
    #[serde(default)]
    pub model: String,
    /// Conversation messages.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Enable streaming response.
    #[serde(default)]
    pub stream: bool,
}

/// OpenAI chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    pub id: String,
    /// Always "chat.completion".
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
}

impl ChatCompletion {
    /// Single-choice assistant completion with `finish_reason: "stop"`.
    pub fn assistant(id: String, created: i64, model: String, content: String) -> Self {
        Self {
            id,
            object: "chat.completion".to_string(),
            created,
            model,
            choices: vec![CompletionChoice {
                index: 0,
                message: ChatMessage::assistant(content),
                finish_reason: "stop".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

/// One incremental SSE frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionChunk {
    pub id: String,
    /// Always "chat.completion.chunk".
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    /// Content delta chunk; `finish_reason` stays empty.
    pub fn delta(id: String, created: i64, model: String, content: String) -> Self {
        Self {
            id,
            object: "chat.completion.chunk".to_string(),
            created,
            model,
            choices: vec![ChunkChoice {
                index: 0,
                delta: Delta { content },
                finish_reason: String::new(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: Delta,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delta {
    pub content: String,
}

/// `GET /v1/models` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelList {
    /// Always "list".
    pub object: String,
    pub data: Vec<ModelCard>,
}

impl ModelList {
    pub fn new(ids: impl IntoIterator<Item = String>, created: i64) -> Self {
        Self {
            object: "list".to_string(),
            data: ids
                .into_iter()
                .map(|id| ModelCard {
                    id,
                    object: "model".to_string(),
                    created,
                    owned_by: "organization-owner".to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelCard {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_content() {
        let msg: ChatMessage = serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
        assert_eq!(msg, ChatMessage::user("hi"));
    }

    #[test]
    fn test_null_and_missing_content() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":null}"#).unwrap();
        assert_eq!(msg.content, "");
        let msg: ChatMessage = serde_json::from_str(r#"{"role":"assistant"}"#).unwrap();
        assert_eq!(msg.content, "");
    }

    #[test]
    fn test_parts_content_flattened() {
        let msg: ChatMessage = serde_json::from_str(
            r#"{"role":"user","content":[
                {"type":"text","text":"first"},
                {"type":"image_url","image_url":{"url":"data:image/png;base64,AAAA"}},
                {"type":"text","text":"second"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(msg.content, "first\nsecond");
    }

    #[test]
    fn test_unknown_role() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"tool","content":"result"}"#).unwrap();
        assert_eq!(msg.role, ChatRole::Unknown);
    }

    #[test]
    fn test_request_defaults() {
        let req: ChatCompletionRequest =
            serde_json::from_str(r#"{"model":"gpt-4o","messages":[],"temperature":0.2}"#)
                .unwrap();
        assert!(!req.stream);
        assert!(req.messages.is_empty());
    }

    #[test]
    fn test_request_without_model() {
        let req: ChatCompletionRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert!(req.model.is_empty());
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn test_chunk_shape() {
        let chunk = ChatCompletionChunk::delta(
            "chatcmpl-1".to_string(),
            1,
            "gpt-4o".to_string(),
            "Hel".to_string(),
        );
        let value = serde_json::to_value(&chunk).unwrap();
        assert_eq!(value["object"], "chat.completion.chunk");
        assert_eq!(value["choices"][0]["delta"]["content"], "Hel");
        assert_eq!(value["choices"][0]["finish_reason"], "");
    }

    #[test]
    fn test_completion_shape() {
        let completion = ChatCompletion::assistant(
            "chatcmpl-1".to_string(),
            1,
            "gpt-4o".to_string(),
            "Hello".to_string(),
        );
        let value = serde_json::to_value(&completion).unwrap();
        assert_eq!(value["object"], "chat.completion");
        assert_eq!(value["choices"][0]["message"]["role"], "assistant");
        assert_eq!(value["choices"][0]["finish_reason"], "stop");
    }
}
