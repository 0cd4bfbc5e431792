//! # Follow-up construction
//!
//! Builds the turns appended before the next round:
//!
//! - the assistant turn echoes the round's tool uses (reduced to
//!   `{id, name, input}`) and carried tool results, plus a synthesized
//!   SQL-execution tool use for pending SQL when no existing one covers it
//! - the user turn answers every SQL call with a tool result whose
//!   `tool_use_id` equals the tool use it answers
//!
//! Either turn is omitted when empty, so a round with tool activity but no
//! SQL to run still carries its assistant turn into the next request. No
//! user-side tool result ever references an id absent from the assistant
//! turn it follows.

use std::collections::HashSet;

use cortex_core::ids::new_tool_use_id;
use cortex_core::{ContentItem, Message, ToolResult, ToolUse, TurnResult};
use serde_json::json;

/// One SQL statement to execute and answer under `tool_use_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlCall {
    /// Tool use the result must correlate with.
    pub tool_use_id: String,
    /// Statement to execute.
    pub sql: String,
}

/// Assistant turn plus the SQL calls whose results form the user turn.
#[derive(Clone, Debug, PartialEq)]
pub struct FollowUpPlan {
    /// Content of the assistant turn.
    pub assistant: Vec<ContentItem>,
    /// Calls to execute, each answering a tool use in `assistant`.
    pub sql_calls: Vec<SqlCall>,
}

impl FollowUpPlan {
    /// Tool use ids introduced by the assistant turn.
    pub fn tool_use_ids(&self) -> HashSet<&str> {
        self.assistant
            .iter()
            .filter_map(ContentItem::as_tool_use)
            .map(|tool_use| tool_use.id.as_str())
            .collect()
    }

    /// Turns answering the plan with `results`, assistant first.
    ///
    /// The assistant turn is kept when it has content and the user turn when
    /// there are results. An empty vector means the round made no progress.
    pub fn into_turns(self, results: Vec<ToolResult>) -> Vec<Message> {
        let mut turns = Vec::with_capacity(2);
        if !self.assistant.is_empty() {
            turns.push(Message::assistant(self.assistant));
        }
        if !results.is_empty() {
            let user = results.into_iter().map(ContentItem::tool_result).collect();
            turns.push(Message::user(user));
        }
        turns
    }
}

/// Plan the follow-up for `turn`.
///
/// `pending` is the SQL discovered by the continuation predicate, if any.
/// An unresolved `sql_exec_tool` use whose input SQL is missing or equal to
/// `pending` answers it under its own id; otherwise a tool use is
/// synthesized. Other unresolved `sql_exec_tool` uses that carry SQL are
/// answered too.
pub fn plan_follow_up(
    turn: &TurnResult,
    pending: Option<&str>,
    sql_exec_tool: &str,
) -> FollowUpPlan {
    let mut assistant: Vec<ContentItem> = turn
        .tool_uses
        .iter()
        .map(|tool_use| ContentItem::tool_use(tool_use.reduced()))
        .collect();
    assistant.extend(turn.tool_results.iter().cloned().map(ContentItem::tool_result));

    let unresolved_exec: Vec<&ToolUse> = turn
        .unresolved_tool_uses()
        .into_iter()
        .filter(|tool_use| tool_use.name == sql_exec_tool)
        .collect();

    let mut sql_calls = Vec::new();
    let mut answered: HashSet<&str> = HashSet::new();

    if let Some(sql) = pending {
        let existing = unresolved_exec
            .iter()
            .copied()
            .find(|tool_use| tool_use.input_sql().is_none_or(|input| input == sql));
        let tool_use_id = match existing {
            Some(tool_use) => {
                let _ = answered.insert(tool_use.id.as_str());
                tool_use.id.clone()
            }
            None => {
                let id = new_tool_use_id();
                assistant.push(ContentItem::tool_use(ToolUse::new(
                    id.clone(),
                    sql_exec_tool,
                    json!({ "sql": sql }),
                )));
                id
            }
        };
        sql_calls.push(SqlCall {
            tool_use_id,
            sql: sql.to_owned(),
        });
    }

    for tool_use in unresolved_exec {
        if answered.contains(tool_use.id.as_str()) {
            continue;
        }
        if let Some(sql) = tool_use.input_sql() {
            let _ = answered.insert(tool_use.id.as_str());
            sql_calls.push(SqlCall {
                tool_use_id: tool_use.id.clone(),
                sql: sql.to_owned(),
            });
        }
    }

    FollowUpPlan { assistant, sql_calls }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
