//! Chat session store for the waste-segregation chatbot
//!
//! Pure append-only log: messages are never mutated or deleted, and the
//! session lives exactly as long as the owning view/handle.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Canned starter questions shown in a fresh chat view
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "How do I segregate wet and dry waste?",
    "What are the benefits of waste segregation?",
    "Can segregated waste be sold? How?",
    "What are some eco-friendly disposal methods?",
];

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One chat message in the session log
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Unique within the session, monotonically increasing by creation time
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Append-only conversation log
///
/// Single-writer by design; callers that share a session across tasks wrap
/// it in a mutex.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatSession {
    /// Create a session seeded with the bot greeting
    #[must_use]
    pub fn new(language: &str) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        session.append(
            Sender::Bot,
            format!(
                "Hello! I'm EcoChatBot — your guide for waste segregation techniques, \
                 benefits, and resale values. Ask me anything in your selected language ({language})."
            ),
        );
        session
    }

    /// Create an empty session with no greeting
    #[must_use]
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a user message, returning a copy of it
    pub fn append_user(&mut self, text: impl Into<String>) -> ChatMessage {
        self.append(Sender::User, text.into())
    }

    /// Append a bot message, returning a copy of it
    pub fn append_bot(&mut self, text: impl Into<String>) -> ChatMessage {
        self.append(Sender::Bot, text.into())
    }

    fn append(&mut self, sender: Sender, text: String) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id.to_string(),
            text,
            sender,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    /// Messages in arrival order
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages in the session
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when no messages have been appended
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_seeded_with_greeting() {
        let session = ChatSession::new("English");
        assert_eq!(session.len(), 1);
        assert_eq!(session.history()[0].sender, Sender::Bot);
        assert!(session.history()[0].text.contains("English"));
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut session = ChatSession::empty();
        for i in 0..20 {
            if i % 2 == 0 {
                session.append_user(format!("q{i}"));
            } else {
                session.append_bot(format!("a{i}"));
            }
        }

        let ids: Vec<u64> = session
            .history()
            .iter()
            .map(|m| m.id.parse().unwrap())
            .collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn history_order_matches_append_order() {
        let mut session = ChatSession::empty();
        session.append_user("How do I segregate wet and dry waste?");
        session.append_bot("Use two bins.");
        session.append_user("Thanks!");

        let senders: Vec<Sender> = session.history().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Bot, Sender::User]);
        assert_eq!(session.history()[0].text, SUGGESTED_QUESTIONS[0]);
    }
}
