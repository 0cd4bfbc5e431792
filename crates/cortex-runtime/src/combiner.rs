//! # Multi-turn combiner
//!
//! Folds every round of a run into one [`CombinedResponse`]:
//!
//! - text is the last round's non-blank narrative (earlier narrative is
//!   dropped)
//! - tool uses, tool results, charts, errors, and raw events concatenate in
//!   round order
//! - query ids are collected from the engine's executions, then tool result
//!   JSON, then raw event payloads, deduplicated by first occurrence

use std::collections::HashSet;

use cortex_core::{CombinedResponse, QueryId, Termination, TurnResult};

/// Combine `rounds` into one response.
pub fn combine(
    rounds: Vec<TurnResult>,
    sqls_executed: Vec<String>,
    direct_query_ids: &[QueryId],
    termination: Termination,
) -> CombinedResponse {
    let iterations = u32::try_from(rounds.len()).unwrap_or(u32::MAX);
    let mut response = CombinedResponse {
        iterations_performed: iterations,
        follow_up_performed: iterations > 1,
        sqls_executed,
        termination,
        ..CombinedResponse::default()
    };

    for round in rounds {
        if round.has_text() {
            response.text = round.text;
        }
        response.tool_uses.extend(round.tool_uses);
        response.tool_results.extend(round.tool_results);
        response.charts.extend(round.charts);
        response.errors.extend(round.errors);
        response.raw_events.extend(round.raw_events);
    }

    response.query_ids = collect_query_ids(&response, direct_query_ids);
    response
}

fn collect_query_ids(response: &CombinedResponse, direct: &[QueryId]) -> Vec<QueryId> {
    let from_results = response.tool_results.iter().flat_map(|r| r.query_ids());
    let from_events = response.raw_events.iter().flat_map(|e| e.query_ids());

    let mut seen = HashSet::new();
    direct
        .iter()
        .map(QueryId::as_str)
        .chain(from_results)
        .chain(from_events)
        .filter(|id| seen.insert(*id))
        .map(QueryId::from)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::{RawEvent, ToolResult, ToolUse};
    use serde_json::json;

    fn round(text: &str) -> TurnResult {
        TurnResult {
            text: text.into(),
            ..TurnResult::default()
        }
    }

    #[test]
    fn single_round_passes_through() {
        let response = combine(vec![round("Olá")], Vec::new(), &[], Termination::Done);
        assert_eq!(response.text, "Olá");
        assert_eq!(response.iterations_performed, 1);
        assert!(!response.follow_up_performed);
        assert!(response.query_ids.is_empty());
    }

    #[test]
    fn last_non_blank_text_wins() {
        let response = combine(
            vec![round("first"), round("second"), round("   ")],
            Vec::new(),
            &[],
            Termination::Done,
        );
        assert_eq!(response.text, "second");
        assert_eq!(response.iterations_performed, 3);
        assert!(response.follow_up_performed);
    }

    #[test]
    fn all_blank_text_is_empty() {
        let response = combine(vec![round(""), round("\n")], Vec::new(), &[], Termination::AbortedLoop);
        assert_eq!(response.text, "");
        assert_eq!(response.termination, Termination::AbortedLoop);
    }

    #[test]
    fn collections_concatenate_in_round_order() {
        let first = TurnResult {
            tool_uses: vec![ToolUse::new("t1", "DATA_BETA", json!({}))],
            charts: vec![json!({"mark": "bar"})],
            ..TurnResult::default()
        };
        let second = TurnResult {
            tool_uses: vec![ToolUse::new("t2", "sql_execution_tool", json!({}))],
            ..TurnResult::default()
        };
        let response = combine(vec![first, second], vec!["SELECT 1".into()], &[], Termination::Done);
        let ids: Vec<&str> = response.tool_uses.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(response.charts.len(), 1);
        assert_eq!(response.sqls_executed, vec!["SELECT 1".to_string()]);
    }

    #[test]
    fn query_ids_ordered_and_deduplicated() {
        let turn = TurnResult {
            tool_results: vec![
                ToolResult::json("t2", "sql_execution_tool", json!({"query_id": "Q1"})),
                ToolResult::json("t3", "sql_execution_tool", json!({"query_id": "Q2"})),
            ],
            raw_events: vec![RawEvent {
                event_type: "message.delta".into(),
                data: json!({"delta": {"content": [{"type": "tool_results", "tool_results": {
                    "content": [{"type": "json", "json": {"query_id": "Q3"}}]
                }}]}}),
            }],
            ..TurnResult::default()
        };
        let response = combine(vec![turn], Vec::new(), &[QueryId::new("Q2")], Termination::Done);
        let ids: Vec<&str> = response.query_ids.iter().map(QueryId::as_str).collect();
        assert_eq!(ids, vec!["Q2", "Q1", "Q3"]);
    }
}
