//! YouChat event stream → OpenAI chat completion (chunks or a single object).

use bytes::{Bytes, BytesMut};
use chrono::Utc;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tracing::debug;
use you2api_types::protocol::{ChatCompletion, ChatCompletionChunk};

use super::models::YouChatToken;
use crate::error::BridgeResult;
use crate::proxy::common::sse_parser::{data_payload, is_event};
use crate::proxy::upstream::ByteStream;

const TOKEN_EVENT: &str = "youChatToken";

/// Envelope fields shared by every chunk of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseContext {
    pub id: String,
    pub created: i64,
    pub model: String,
}

impl ResponseContext {
    pub fn new(model: impl Into<String>) -> Self {
        let created = Utc::now().timestamp();
        Self { id: format!("chatcmpl-{created}"), created, model: model.into() }
    }
}

/// Line splitter plus the one bit of state the token protocol needs:
/// whether the previous line announced a token.
#[derive(Default)]
struct TokenDecoder {
    buffer: BytesMut,
    awaiting_token_data: bool,
}

impl TokenDecoder {
    fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut tokens = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_raw = self.buffer.split_to(pos + 1);
            self.decode_line(&line_raw[..pos], &mut tokens);
        }
        tokens
    }

    /// Flush an unterminated trailing line.
    fn finish(&mut self) -> Vec<String> {
        let mut tokens = Vec::new();
        if !self.buffer.is_empty() {
            let rest = self.buffer.split();
            self.decode_line(&rest, &mut tokens);
        }
        tokens
    }

    fn decode_line(&mut self, raw: &[u8], tokens: &mut Vec<String>) {
        let Ok(line) = std::str::from_utf8(raw) else {
            debug!("[YouChat-SSE] Skipping non UTF-8 line ({} bytes)", raw.len());
            self.awaiting_token_data = false;
            return;
        };
        let line = line.trim_end_matches('\r');

        if std::mem::take(&mut self.awaiting_token_data) {
            match data_payload(line).map(|payload| serde_json::from_str::<YouChatToken>(&payload)) {
                Some(Ok(parsed)) => tokens.push(parsed.token),
                Some(Err(e)) => debug!("[YouChat-SSE] Unparseable token payload: {}", e),
                None => debug!("[YouChat-SSE] Token event not followed by data line"),
            }
            return;
        }

        if is_event(line, TOKEN_EVENT) {
            self.awaiting_token_data = true;
        }
    }
}

/// Translate the upstream body into OpenAI `chat.completion.chunk` frames.
///
/// One frame per token, in upstream order. `[DONE]` is left to the caller.
pub fn create_openai_sse_stream(
    mut upstream: ByteStream,
    context: ResponseContext,
) -> Pin<Box<dyn Stream<Item = BridgeResult<Bytes>> + Send>> {
    let stream = async_stream::stream! {
        let mut decoder = TokenDecoder::default();
        let mut emitted = 0usize;

        while let Some(item) = upstream.next().await {
            match item {
                Ok(bytes) => {
                    for token in decoder.feed(&bytes) {
                        emitted += 1;
                        yield chunk_frame(&context, token);
                    }
                }
                Err(e) => {
                    debug!("[YouChat-SSE] Upstream stream error after {} chunks: {}", emitted, e);
                    yield Err(e);
                    return;
                }
            }
        }
        for token in decoder.finish() {
            emitted += 1;
            yield chunk_frame(&context, token);
        }
        debug!("[YouChat-SSE] Stream finished, {} chunks emitted", emitted);
    };

    Box::pin(stream)
}

fn chunk_frame(context: &ResponseContext, token: String) -> BridgeResult<Bytes> {
    let chunk = ChatCompletionChunk::delta(
        context.id.clone(),
        context.created,
        context.model.clone(),
        token,
    );
    let json = serde_json::to_string(&chunk)?;
    Ok(Bytes::from(format!("data: {}\n\n", json)))
}

/// Drain the upstream body and return one assistant completion.
pub async fn collect_completion(
    mut upstream: ByteStream,
    context: &ResponseContext,
) -> BridgeResult<ChatCompletion> {
    let mut decoder = TokenDecoder::default();
    let mut content = String::new();

    while let Some(item) = upstream.next().await {
        for token in decoder.feed(&item?) {
            content.push_str(&token);
        }
    }
    for token in decoder.finish() {
        content.push_str(&token);
    }

    Ok(ChatCompletion::assistant(
        context.id.clone(),
        context.created,
        context.model.clone(),
        content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use futures::stream;

    fn context() -> ResponseContext {
        ResponseContext { id: "chatcmpl-1".to_string(), created: 1, model: "gpt-4o".to_string() }
    }

    fn upstream(chunks: Vec<&'static [u8]>) -> ByteStream {
        Box::pin(stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from_static(c)))))
    }

    async fn frames(upstream: ByteStream) -> Vec<serde_json::Value> {
        create_openai_sse_stream(upstream, context())
            .map(|frame| {
                let frame = frame.unwrap();
                let text = std::str::from_utf8(&frame).unwrap().to_string();
                let json = text.strip_prefix("data: ").unwrap().strip_suffix("\n\n").unwrap();
                serde_json::from_str(json).unwrap()
            })
            .collect()
            .await
    }

    #[test]
    fn test_response_context_id() {
        let ctx = ResponseContext::new("deepseek_v3");
        assert_eq!(ctx.id, format!("chatcmpl-{}", ctx.created));
        assert_eq!(ctx.model, "deepseek_v3");
    }

    #[tokio::test]
    async fn test_tokens_become_chunks() {
        let body: &'static [u8] = b"event: youChatToken\ndata: {\"youChatToken\": \"Hel\"}\n\n\
event: youChatToken\ndata: {\"youChatToken\": \"lo\"}\n\n";
        let frames = frames(upstream(vec![body])).await;

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["choices"][0]["delta"]["content"], "Hel");
        assert_eq!(frames[1]["choices"][0]["delta"]["content"], "lo");
        assert_eq!(frames[0]["object"], "chat.completion.chunk");
        assert_eq!(frames[0]["id"], "chatcmpl-1");
        assert_eq!(frames[0]["model"], "gpt-4o");
        assert_eq!(frames[0]["choices"][0]["finish_reason"], "");
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let frames = frames(upstream(vec![
            &b"event: you"[..],
            &b"ChatToken\r\ndata: {\"youChat"[..],
            &b"Token\": \"\xe4\xbd"[..],
            &b"\xa0\"}\r\n"[..],
        ]))
        .await;

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["choices"][0]["delta"]["content"], "你");
    }

    #[tokio::test]
    async fn test_other_events_and_bad_payloads_skipped() {
        let body: &'static [u8] = b"event: youChatUpdate\ndata: {\"youChatToken\": \"nope\"}\n\
event: youChatToken\n\ndata: {\"youChatToken\": \"late\"}\n\
event: youChatToken\ndata: not json\n\
data: {\"youChatToken\": \"orphan\"}\n\
event: youChatToken\ndata: {\"youChatToken\": \"ok\"}\n";
        let frames = frames(upstream(vec![body])).await;

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["choices"][0]["delta"]["content"], "ok");
    }

    #[tokio::test]
    async fn test_unterminated_final_line() {
        let body: &'static [u8] = b"event: youChatToken\ndata: {\"youChatToken\": \"end\"}";
        let completion = collect_completion(upstream(vec![body]), &context()).await.unwrap();
        assert_eq!(completion.choices[0].message.content, "end");
    }

    #[tokio::test]
    async fn test_collect_completion() {
        let body: &'static [u8] = b"event: youChatToken\ndata: {\"youChatToken\": \"a\"}\n\
event: youChatToken\ndata: {\"youChatToken\": \"b\"}\n\
event: done\ndata: I'm done\n";
        let completion = collect_completion(upstream(vec![body]), &context()).await.unwrap();

        assert_eq!(completion.object, "chat.completion");
        assert_eq!(completion.choices[0].message.content, "ab");
        assert_eq!(completion.choices[0].finish_reason, "stop");
    }

    #[tokio::test]
    async fn test_empty_stream_yields_empty_content() {
        let completion = collect_completion(upstream(Vec::new()), &context()).await.unwrap();
        assert_eq!(completion.choices[0].message.content, "");

        assert!(frames(upstream(Vec::new())).await.is_empty());
    }

    #[tokio::test]
    async fn test_stream_error_propagates() {
        let items: Vec<BridgeResult<Bytes>> = vec![
            Ok(Bytes::from_static(b"event: youChatToken\ndata: {\"youChatToken\": \"x\"}\n")),
            Err(BridgeError::Timeout(1)),
        ];
        let mut stream = create_openai_sse_stream(Box::pin(stream::iter(items)), context());

        assert!(stream.next().await.unwrap().is_ok());
        assert!(matches!(stream.next().await, Some(Err(BridgeError::Timeout(1)))));
        assert!(stream.next().await.is_none());

        let items: Vec<BridgeResult<Bytes>> = vec![Err(BridgeError::Timeout(1))];
        let err = collect_completion(Box::pin(stream::iter(items)), &context()).await.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(1)));
    }
}
