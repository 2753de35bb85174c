//! Chat messages and the append-only transcript.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Unique identifier of a message within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed locally by the person at the keyboard.
    User,
    /// A reply from the endpoint, or a fallback text standing in for one.
    Assistant,
}

impl Sender {
    /// Display label used by renderers.
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Assistant",
        }
    }
}

/// A single entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within the session.
    pub id: MessageId,
    /// Message body exactly as typed or received.
    pub text: String,
    /// Author of the message.
    pub sender: Sender,
    /// When the message entered the transcript.
    #[serde(with = "crate::utils::time")]
    pub timestamp: OffsetDateTime,
}

impl Message {
    /// Returns true if the message was typed by the user.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Ordered, append-only list of messages.
///
/// Messages can only be pushed; nothing is ever edited, removed or reordered.
/// Timestamps never decrease along the list: if the wall clock steps
/// backwards, the new message reuses the previous timestamp.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message stamped with the current time and returns it.
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> &Message {
        self.push_at(sender, text, OffsetDateTime::now_utc())
    }

    fn push_at(
        &mut self,
        sender: Sender,
        text: impl Into<String>,
        now: OffsetDateTime,
    ) -> &Message {
        let timestamp = match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.messages.push(Message {
            id: MessageId::generate(),
            text: text.into(),
            sender,
            timestamp,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Returns all messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use time::macros::datetime;

    #[test]
    fn push_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(Sender::User, "first");
        transcript.push(Sender::Assistant, "second");
        transcript.push(Sender::User, "third");

        let texts: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(transcript.messages()[0].is_user());
        assert!(!transcript.messages()[1].is_user());
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let mut transcript = Transcript::new();
        let later = datetime!(2024-05-01 12:00:10 UTC);
        let earlier = datetime!(2024-05-01 12:00:00 UTC);

        transcript.push_at(Sender::User, "a", later);
        let second = transcript.push_at(Sender::Assistant, "b", earlier);
        assert_eq!(second.timestamp, later);

        for pair in transcript.messages().windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut transcript = Transcript::new();
        for i in 0..1000 {
            transcript.push(Sender::User, format!("message {i}"));
        }
        let ids: HashSet<&MessageId> = transcript.messages().iter().map(|m| &m.id).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn serializes_sender_and_timestamp() {
        let message = Message {
            id: MessageId("abc".to_string()),
            text: "hi".to_string(),
            sender: Sender::Assistant,
            timestamp: datetime!(2024-05-01 12:00:00 UTC),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["sender"], "assistant");
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00Z");
    }
}
