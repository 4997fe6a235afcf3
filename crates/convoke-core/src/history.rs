//! The conversation transcript.
//!
//! An append-only, ordered sequence of labeled messages. The transcript
//! exists for display only -- the dialogue logic never reads it back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// A single labeled transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.speaker {
            Speaker::User => write!(f, "You: {}", self.text),
            Speaker::Assistant => write!(f, "AI: {}", self.text),
        }
    }
}

/// Append-only message history for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user entry.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            speaker: Speaker::User,
            text: text.into(),
        });
    }

    /// Append an assistant entry.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            speaker: Speaker::Assistant,
            text: text.into(),
        });
    }

    /// All entries, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.push_assistant("hello");
        transcript.push_user("make an invite");

        let texts: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, ["hi", "hello", "make an invite"]);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last().unwrap().speaker, Speaker::User);
    }

    #[test]
    fn display_labels_speakers() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.push_assistant("hello");

        assert_eq!(transcript.messages()[0].to_string(), "You: hi");
        assert_eq!(transcript.messages()[1].to_string(), "AI: hello");
    }
}
