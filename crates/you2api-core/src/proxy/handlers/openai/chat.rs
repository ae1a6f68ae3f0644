// OpenAI chat completions → YouChat streaming search
use super::*;

use axum::{
    body::Body,
    http::header,
    response::Response,
    Extension,
};
use bytes::Bytes;
use futures::{stream, StreamExt};
use std::time::Duration;
use you2api_types::protocol::ChatCompletionRequest;

use crate::error::{BridgeError, BridgeResult};
use crate::proxy::mappers::youchat::{
    collect_completion, create_openai_sse_stream, fold_history, normalize_system_messages,
    ContentExternalizer, ResponseContext, UpstreamRequestParams,
};
use crate::proxy::middleware::UpstreamCredential;

const DONE_FRAME: &[u8] = b"data: [DONE]\n\n";

pub async fn handle_chat_completions(
    State(state): State<AppState>,
    Extension(UpstreamCredential(credential)): Extension<UpstreamCredential>,
    body: Bytes,
) -> BridgeResult<Response> {
    let request: ChatCompletionRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("[OpenAI-Chat] Rejecting request body: {}", e);
        BridgeError::InvalidRequest("Invalid request body".to_string())
    })?;

    info!(
        "[OpenAI-Chat] model={} stream={} messages={}",
        request.model,
        request.stream,
        request.messages.len()
    );

    let context = ResponseContext::new(state.models.response_model(&request.model));
    let selection = state.models.select(&request.model);

    let folded = fold_history(normalize_system_messages(request.messages))?;
    let conversation = ContentExternalizer::new(state.upstream.as_ref(), &credential, &state.bridge)
        .externalize(folded)
        .await?;
    let params = UpstreamRequestParams::build(&conversation, selection, &state.bridge.market)?;

    if request.stream {
        let upstream = state.upstream.streaming_search(&credential, &params).await?;
        let frames = create_openai_sse_stream(upstream, context)
            .chain(stream::once(async { Ok::<Bytes, BridgeError>(Bytes::from_static(DONE_FRAME)) }));

        return Ok((
            [
                (header::CONTENT_TYPE, "text/event-stream"),
                (header::CACHE_CONTROL, "no-cache"),
                (header::CONNECTION, "keep-alive"),
            ],
            Body::from_stream(frames),
        )
            .into_response());
    }

    let timeout_secs = state.bridge.non_stream_timeout_secs;
    let completion = tokio::time::timeout(Duration::from_secs(timeout_secs), async {
        let upstream = state.upstream.streaming_search(&credential, &params).await?;
        collect_completion(upstream, &context).await
    })
    .await
    .map_err(|_| BridgeError::Timeout(timeout_secs))??;

    debug!(
        "[OpenAI-Chat] Completed {} ({} chars)",
        completion.id,
        completion.choices.first().map_or(0, |c| c.message.content.len())
    );
    Ok(Json(completion).into_response())
}
