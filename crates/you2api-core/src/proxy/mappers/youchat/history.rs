//! Folding a flat OpenAI transcript into YouChat question/answer pairs.

use you2api_types::protocol::{ChatMessage, ChatRole};

use super::models::HistoryEntry;
use crate::error::{BridgeError, BridgeResult};

/// History plus the final message, which is never folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedConversation {
    pub history: Vec<HistoryEntry>,
    pub current_turn: ChatMessage,
}

/// Collapse every `system` message into one synthetic leading `user` message.
///
/// System contents are joined with `\n` in original order. Without any system
/// message the input is returned unchanged.
pub fn normalize_system_messages(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let (system, rest): (Vec<_>, Vec<_>) =
        messages.into_iter().partition(|m| m.role == ChatRole::System);

    if system.is_empty() {
        return rest;
    }

    let merged = system.into_iter().map(|m| m.content).collect::<Vec<_>>().join("\n");
    let mut normalized = Vec::with_capacity(rest.len() + 1);
    normalized.push(ChatMessage::user(merged));
    normalized.extend(rest);
    normalized
}

/// Open question/answer pair while walking the transcript.
#[derive(Default)]
struct Turn {
    question: Option<String>,
    answer: Option<String>,
}

impl Turn {
    fn is_open(&self) -> bool {
        self.question.is_some() || self.answer.is_some()
    }

    fn into_entry(self) -> HistoryEntry {
        HistoryEntry::new(self.question.unwrap_or_default(), self.answer.unwrap_or_default())
    }
}

fn push_line(target: &mut String, content: &str) {
    target.push('\n');
    target.push_str(content);
}

fn flush(turn: Turn, history: &mut Vec<HistoryEntry>) {
    if !turn.is_open() {
        return;
    }
    let entry = turn.into_entry();
    if !entry.is_empty() {
        history.push(entry);
    }
}

/// Fold all messages but the last into [`HistoryEntry`] pairs.
///
/// Consecutive user messages merge into one question; consecutive assistant
/// messages merge into one answer. An assistant message with no open question
/// answers an empty one. Roles other than user/assistant are skipped.
pub fn fold_history(mut messages: Vec<ChatMessage>) -> BridgeResult<FoldedConversation> {
    let current_turn = messages
        .pop()
        .ok_or_else(|| BridgeError::InvalidRequest("messages must not be empty".to_string()))?;

    let mut history = Vec::new();
    let mut turn = Turn::default();

    for message in messages {
        match message.role {
            ChatRole::User => {
                if turn.question.is_some() && turn.answer.is_some() {
                    flush(std::mem::take(&mut turn), &mut history);
                    turn.question = Some(message.content);
                } else if let Some(question) = turn.question.as_mut() {
                    push_line(question, &message.content);
                } else {
                    turn.question = Some(message.content);
                }
            },
            ChatRole::Assistant => {
                if turn.question.is_none() {
                    turn.question = Some(String::new());
                    turn.answer = Some(message.content);
                } else if let Some(answer) = turn.answer.as_mut() {
                    push_line(answer, &message.content);
                } else {
                    turn.answer = Some(message.content);
                }
            },
            ChatRole::System | ChatRole::Unknown => {
                tracing::debug!("[YouChat-History] Skipping {:?} message", message.role);
            },
        }
    }
    flush(turn, &mut history);

    Ok(FoldedConversation { history, current_turn })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(messages: Vec<ChatMessage>) -> FoldedConversation {
        fold_history(normalize_system_messages(messages)).unwrap()
    }

    #[test]
    fn test_empty_messages_rejected() {
        assert!(matches!(fold_history(Vec::new()), Err(BridgeError::InvalidRequest(_))));
    }

    #[test]
    fn test_single_message_has_no_history() {
        let folded = fold(vec![ChatMessage::user("hi")]);
        assert!(folded.history.is_empty());
        assert_eq!(folded.current_turn, ChatMessage::user("hi"));
    }

    #[test]
    fn test_simple_pairs() {
        let folded = fold(vec![
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("q2"),
            ChatMessage::assistant("a2"),
            ChatMessage::user("q3"),
        ]);
        assert_eq!(folded.history, vec![HistoryEntry::new("q1", "a1"), HistoryEntry::new("q2", "a2")]);
        assert_eq!(folded.current_turn.content, "q3");
    }

    #[test]
    fn test_system_messages_become_leading_question() {
        let folded = fold(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("q1"),
            ChatMessage::system("use english"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("q2"),
        ]);
        assert_eq!(
            folded.history,
            vec![HistoryEntry::new("be brief\nuse english\nq1", "a1")]
        );
    }

    #[test]
    fn test_only_system_message_is_current_turn() {
        let folded = fold(vec![ChatMessage::system("rules")]);
        assert!(folded.history.is_empty());
        assert_eq!(folded.current_turn, ChatMessage::user("rules"));
    }

    #[test]
    fn test_consecutive_users_merge() {
        let folded = fold(vec![
            ChatMessage::user("part one"),
            ChatMessage::user("part two"),
            ChatMessage::assistant("answer"),
            ChatMessage::user("next"),
        ]);
        assert_eq!(folded.history, vec![HistoryEntry::new("part one\npart two", "answer")]);
    }

    #[test]
    fn test_consecutive_assistants_merge() {
        let folded = fold(vec![
            ChatMessage::user("q"),
            ChatMessage::assistant("first"),
            ChatMessage::assistant("second"),
            ChatMessage::user("next"),
        ]);
        assert_eq!(folded.history, vec![HistoryEntry::new("q", "first\nsecond")]);
    }

    #[test]
    fn test_leading_assistant_answers_empty_question() {
        let folded = fold(vec![
            ChatMessage::assistant("hello, how can I help?"),
            ChatMessage::user("q"),
            ChatMessage::assistant("a"),
            ChatMessage::user("next"),
        ]);
        assert_eq!(
            folded.history,
            vec![HistoryEntry::new("", "hello, how can I help?"), HistoryEntry::new("q", "a")]
        );
    }

    #[test]
    fn test_trailing_question_without_answer() {
        let folded = fold(vec![
            ChatMessage::user("q1"),
            ChatMessage::user("q2"),
            ChatMessage::assistant("a"),
            ChatMessage::user("unanswered"),
            ChatMessage::user("current"),
        ]);
        assert_eq!(
            folded.history,
            vec![HistoryEntry::new("q1\nq2", "a"), HistoryEntry::new("unanswered", "")]
        );
    }

    #[test]
    fn test_unknown_roles_skipped_and_empty_entries_dropped() {
        let folded = fold(vec![
            ChatMessage::new(ChatRole::Unknown, "tool output"),
            ChatMessage::user(""),
            ChatMessage::assistant(""),
            ChatMessage::user("current"),
        ]);
        assert!(folded.history.is_empty());
    }

    #[test]
    fn test_last_message_never_folded() {
        let folded = fold(vec![ChatMessage::user("q"), ChatMessage::assistant("a")]);
        assert_eq!(folded.history, vec![HistoryEntry::new("q", "")]);
        assert_eq!(folded.current_turn, ChatMessage::assistant("a"));
    }

    #[test]
    fn test_content_preserved_in_order() {
        let messages = vec![
            ChatMessage::user("u1"),
            ChatMessage::user("u2"),
            ChatMessage::assistant("a1"),
            ChatMessage::assistant("a2"),
            ChatMessage::user("u3"),
            ChatMessage::assistant("a3"),
            ChatMessage::user("last"),
        ];
        let folded = fold(messages);
        let joined: Vec<String> = folded
            .history
            .iter()
            .flat_map(|e| [e.question.clone(), e.answer.clone()])
            .flat_map(|s| s.split('\n').map(str::to_string).collect::<Vec<_>>())
            .collect();
        assert_eq!(joined, vec!["u1", "u2", "a1", "a2", "u3", "a3"]);
    }
}
