//! Agent stream events.
//!
//! The agent answers with a stream of labelled records. The labels this
//! client understands are decoded into [`AgentEvent::MessageDelta`] and
//! [`AgentEvent::Error`]; every other label is kept as [`AgentEvent::Other`]
//! so nothing valid is dropped silently.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::content::ContentItem;

/// Label of incremental message content events.
pub const MESSAGE_DELTA: &str = "message.delta";

/// Label of error events.
pub const ERROR: &str = "error";

/// A decoded agent stream event.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentEvent {
    /// Incremental message content, in order.
    MessageDelta {
        /// Content items carried by this delta.
        content: Vec<ContentItem>,
    },
    /// An error reported in-band by the agent.
    Error(EventError),
    /// A valid record with a label this client does not interpret.
    Other {
        /// The label, verbatim.
        label: String,
        /// The decoded payload.
        data: Value,
    },
}

impl AgentEvent {
    /// The record label this event came from.
    pub fn label(&self) -> &str {
        match self {
            Self::MessageDelta { .. } => MESSAGE_DELTA,
            Self::Error(_) => ERROR,
            Self::Other { label, .. } => label,
        }
    }

    /// Audit copy of this event in wire shape.
    #[must_use]
    pub fn to_raw(&self) -> RawEvent {
        let data = match self {
            Self::MessageDelta { content } => json!({"delta": {"content": content}}),
            Self::Error(err) => serde_json::to_value(err).unwrap_or_default(),
            Self::Other { data, .. } => data.clone(),
        };
        RawEvent {
            event_type: self.label().to_owned(),
            data,
        }
    }
}

/// Error payload of an `error` event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventError {
    /// Machine-readable code, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl EventError {
    /// Decode an error payload.
    ///
    /// Accepts both `{"code", "message"}` and `{"error": {"code", "message"}}`.
    /// Numeric codes are stringified.
    #[must_use]
    pub fn from_payload(data: &Value) -> Self {
        let body = data.get("error").filter(|e| e.is_object()).unwrap_or(data);
        let code = body.get("code").and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| body.to_string(), str::to_owned);
        Self { code, message }
    }
}

/// Undecoded audit record of a stream event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Record label.
    pub event_type: String,
    /// Record payload.
    pub data: Value,
}

impl RawEvent {
    /// Every `query_id` nested in `data.delta.content[].tool_results.content[].json`.
    pub fn query_ids(&self) -> impl Iterator<Item = &str> {
        self.data
            .pointer("/delta/content")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("tool_results"))
            .filter_map(|item| item.pointer("/tool_results/content").and_then(Value::as_array))
            .flatten()
            .filter(|c| c.get("type").and_then(Value::as_str) == Some("json"))
            .filter_map(|c| c.pointer("/json/query_id").and_then(Value::as_str))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
