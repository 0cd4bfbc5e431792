//! Per-round and combined results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{ToolResult, ToolUse};
use crate::events::{EventError, RawEvent};
use crate::ids::QueryId;
use crate::text::is_blank;

/// Everything one agent round trip produced.
///
/// Built once per round by the response aggregator and not modified after.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Concatenated narrative text.
    pub text: String,
    /// Tool use intents, in stream order.
    pub tool_uses: Vec<ToolUse>,
    /// Tool results, in stream order.
    pub tool_results: Vec<ToolResult>,
    /// Chart specifications.
    pub charts: Vec<Value>,
    /// In-band errors reported by the agent.
    pub errors: Vec<EventError>,
    /// Audit copy of every event.
    pub raw_events: Vec<RawEvent>,
}

impl TurnResult {
    /// Whether the narrative has non-whitespace content.
    pub fn has_text(&self) -> bool {
        !is_blank(&self.text)
    }

    /// Whether any tool use or tool result was produced.
    pub fn has_tool_activity(&self) -> bool {
        !self.tool_uses.is_empty() || !self.tool_results.is_empty()
    }

    /// Tool uses with no tool result carrying their ID, in order.
    pub fn unresolved_tool_uses(&self) -> Vec<&ToolUse> {
        let resolved: HashSet<&str> = self
            .tool_results
            .iter()
            .map(|r| r.tool_use_id.as_str())
            .collect();
        self.tool_uses
            .iter()
            .filter(|u| !resolved.contains(u.id.as_str()))
            .collect()
    }

    /// Whether a tool result answers the given tool use ID.
    pub fn is_resolved(&self, tool_use_id: &str) -> bool {
        self.tool_results.iter().any(|r| r.tool_use_id == tool_use_id)
    }
}

/// Terminal state of a continuation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// No further round trip was needed.
    #[default]
    Done,
    /// A pending-tool signature repeated, or no follow-up progress was possible.
    AbortedLoop,
    /// The iteration cap was reached before completion.
    AbortedMaxIter,
}

impl Termination {
    /// Whether the answer is complete.
    pub fn is_complete(self) -> bool {
        self == Self::Done
    }
}

/// All rounds of one request folded into a single answer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedResponse {
    /// Last non-blank narrative, possibly followed by an appended table block.
    pub text: String,
    /// Tool uses across rounds.
    pub tool_uses: Vec<ToolUse>,
    /// Tool results across rounds.
    pub tool_results: Vec<ToolResult>,
    /// Charts across rounds.
    pub charts: Vec<Value>,
    /// Errors across rounds.
    pub errors: Vec<EventError>,
    /// Raw events across rounds.
    pub raw_events: Vec<RawEvent>,
    /// Number of round trips performed.
    pub iterations_performed: u32,
    /// Whether more than one round trip was performed.
    pub follow_up_performed: bool,
    /// SQL statements discovered for execution, in discovery order.
    pub sqls_executed: Vec<String>,
    /// Execution identifiers discovered, deduplicated by first occurrence.
    pub query_ids: Vec<QueryId>,
    /// How the run ended.
    pub termination: Termination,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn turn_with(uses: &[(&str, &str)], results: &[&str]) -> TurnResult {
        TurnResult {
            tool_uses: uses
                .iter()
                .map(|(id, name)| ToolUse::new(*id, *name, json!({})))
                .collect(),
            tool_results: results
                .iter()
                .map(|id| ToolResult {
                    tool_use_id: (*id).to_owned(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn unresolved_tool_uses_in_order() {
        let turn = turn_with(&[("t1", "a"), ("t2", "b"), ("t3", "c")], &["t2"]);
        let ids: Vec<&str> = turn.unresolved_tool_uses().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert!(turn.is_resolved("t2"));
        assert!(!turn.is_resolved("t1"));
    }

    #[test]
    fn blank_text_is_not_text() {
        let turn = TurnResult {
            text: "  \n".into(),
            ..Default::default()
        };
        assert!(!turn.has_text());
        assert!(!turn.has_tool_activity());
    }

    #[test]
    fn termination_serializes_snake_case() {
        assert_eq!(serde_json::to_value(Termination::AbortedMaxIter).unwrap(), json!("aborted_max_iter"));
        assert!(Termination::Done.is_complete());
        assert!(!Termination::AbortedLoop.is_complete());
    }
}
