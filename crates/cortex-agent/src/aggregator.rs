//! # Response aggregator
//!
//! Folds one round's events into a [`TurnResult`]. Error events are
//! collected without stopping the fold; every event is also kept in
//! `raw_events` for audit.

use cortex_core::{AgentEvent, ContentItem, TurnResult};

/// Fold events, in order, into one turn result.
pub fn aggregate(events: Vec<AgentEvent>) -> TurnResult {
    let mut turn = TurnResult::default();
    for event in events {
        turn.raw_events.push(event.to_raw());
        match event {
            AgentEvent::MessageDelta { content } => {
                for item in content {
                    match item {
                        ContentItem::Text { text } => turn.text.push_str(&text),
                        ContentItem::ToolUse { tool_use } => turn.tool_uses.push(tool_use),
                        ContentItem::ToolResult { tool_results } => {
                            turn.tool_results.push(tool_results);
                        }
                        ContentItem::Chart { chart } => turn.charts.push(chart),
                    }
                }
            }
            AgentEvent::Error(err) => {
                tracing::warn!(code = ?err.code, message = %err.message, "agent reported error event");
                turn.errors.push(err);
            }
            AgentEvent::Other { .. } => {}
        }
    }
    turn
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
