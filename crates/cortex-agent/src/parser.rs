//! # Event stream parser
//!
//! Decodes [`EventRecord`]s into [`AgentEvent`]s. A record whose payload is
//! not JSON is logged and skipped; parsing never fails as a whole.

use cortex_core::events::{ERROR, MESSAGE_DELTA};
use cortex_core::text::truncate_str;
use cortex_core::{AgentEvent, ContentItem, EventError};
use serde_json::Value;
use tracing::warn;

use crate::records::{EventRecord, RecordReader};

/// Parse a complete response body into ordered events.
///
/// The sentinel record produces no event. Unknown labels produce
/// [`AgentEvent::Other`] with the label preserved.
pub fn parse_event_stream(text: &str) -> Vec<AgentEvent> {
    RecordReader::new(text)
        .filter(|record| !record.is_sentinel())
        .filter_map(|record| decode_record(&record))
        .collect()
}

/// Decode one record. Returns `None` (after logging) for undecodable payloads.
pub fn decode_record(record: &EventRecord<'_>) -> Option<AgentEvent> {
    let data: Value = match serde_json::from_str(record.payload) {
        Ok(data) => data,
        Err(e) => {
            warn!(
                label = record.label,
                error = %e,
                data_preview = truncate_str(record.payload, 100),
                "failed to decode event payload, skipping record"
            );
            return None;
        }
    };

    let event = match record.label {
        MESSAGE_DELTA => AgentEvent::MessageDelta {
            content: decode_content(&data),
        },
        ERROR => AgentEvent::Error(EventError::from_payload(&data)),
        label => AgentEvent::Other {
            label: label.to_owned(),
            data,
        },
    };
    Some(event)
}

/// Content items of a `message.delta` payload, in order.
///
/// Items that are not a known content type are dropped with a warning.
fn decode_content(data: &Value) -> Vec<ContentItem> {
    let Some(items) = data.pointer("/delta/content").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<ContentItem>(item.clone()) {
            Ok(content) => Some(content),
            Err(e) => {
                let item_type = item.get("type").and_then(Value::as_str).unwrap_or("<missing>");
                warn!(
                    item_type,
                    error = %e,
                    "dropping undecodable content item"
                );
                None
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
