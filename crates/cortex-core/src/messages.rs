//! Conversation messages.
//!
//! A conversation is an ordered list of [`Message`]s sent as the `messages`
//! field of every agent request. Within one logical request the list is
//! append-only.

use serde::{Deserialize, Serialize};

use crate::content::ContentItem;

/// Message author.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The caller.
    User,
    /// The agent.
    Assistant,
}

/// One conversation turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the turn.
    pub role: Role,
    /// Ordered content items.
    pub content: Vec<ContentItem>,
}

impl Message {
    /// Create a user turn.
    #[must_use]
    pub fn user(content: Vec<ContentItem>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    /// Create an assistant turn.
    #[must_use]
    pub fn assistant(content: Vec<ContentItem>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Create a user turn holding a single text item.
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![ContentItem::text(text)])
    }

    /// Create an assistant turn holding a single text item.
    #[must_use]
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::assistant(vec![ContentItem::text(text)])
    }

    /// Whether the turn carries no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// What a caller hands to the engine: a message list or a single question.
#[derive(Clone, Debug, PartialEq)]
pub enum ConversationInput {
    /// An explicit message list.
    Messages(Vec<Message>),
    /// A freeform question, wrapped as one user turn.
    Text(String),
}

impl ConversationInput {
    /// Resolve into the seed message list.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Self::Messages(messages) => messages,
            Self::Text(text) => vec![Message::user_text(text)],
        }
    }
}

impl From<Vec<Message>> for ConversationInput {
    fn from(messages: Vec<Message>) -> Self {
        Self::Messages(messages)
    }
}

impl From<String> for ConversationInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ConversationInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
