//! Assembling `GET /api/streamingSearch` query parameters.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use super::externalize::ExternalizedConversation;
use crate::error::BridgeResult;
use crate::proxy::common::model_mapping::ModelSelection;

/// Everything the search call needs, rendered to query pairs by [`Self::query_pairs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequestParams {
    pub query: String,
    /// JSON array of `{question, answer}`.
    pub chat: String,
    /// JSON array of uploaded sources; `None` when nothing was uploaded.
    pub sources: Option<String>,
    pub selection: ModelSelection,
    pub chat_id: String,
    pub conversation_turn_id: String,
    pub trace_id: String,
    pub past_chat_length: usize,
    pub market: String,
}

impl UpstreamRequestParams {
    /// Build with fresh UUIDv4 chat/turn ids and the current time.
    pub fn build(
        conversation: &ExternalizedConversation,
        selection: ModelSelection,
        market: &str,
    ) -> BridgeResult<Self> {
        Self::build_with(
            conversation,
            selection,
            market,
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
            Utc::now(),
        )
    }

    pub fn build_with(
        conversation: &ExternalizedConversation,
        selection: ModelSelection,
        market: &str,
        chat_id: String,
        conversation_turn_id: String,
        now: DateTime<Utc>,
    ) -> BridgeResult<Self> {
        let chat = serde_json::to_string(&conversation.history)?;
        let sources = if conversation.sources.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&conversation.sources)?)
        };
        let trace_id = format!(
            "{}|{}|{}",
            chat_id,
            conversation_turn_id,
            now.to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        Ok(Self {
            query: conversation.current_turn.clone(),
            chat,
            sources,
            selection,
            chat_id,
            conversation_turn_id,
            trace_id,
            past_chat_length: conversation.history.len(),
            market: market.to_string(),
        })
    }

    /// Query pairs in the exact order upstream expects.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", "1".to_string()),
            ("count", "10".to_string()),
            ("safeSearch", "Moderate".to_string()),
            ("mkt", self.market.clone()),
            // Upstream spells it this way.
            ("enable_worklow_generation_ux", "true".to_string()),
            ("domain", "youchat".to_string()),
            ("use_personalization_extraction", "true".to_string()),
            ("queryTraceId", self.chat_id.clone()),
            ("chatId", self.chat_id.clone()),
            ("conversationTurnId", self.conversation_turn_id.clone()),
            ("pastChatLength", self.past_chat_length.to_string()),
            ("enable_agent_clarification_questions", "true".to_string()),
            ("traceId", self.trace_id.clone()),
            ("use_nested_youchat_updates", "true".to_string()),
        ];
        pairs.extend(self.selection.query_pairs());
        if let Some(sources) = &self.sources {
            pairs.push(("sources", sources.clone()));
        }
        pairs.push(("q", self.query.clone()));
        pairs.push(("chat", self.chat.clone()));
        pairs
    }
}
