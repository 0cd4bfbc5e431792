//! # Continuation predicate
//!
//! Rules, checked in order against the latest turn (first match wins):
//! 1. **Pending SQL**: a successful tool result carries `sql` that no
//!    resolved SQL-execution tool use in the same turn has run yet
//! 2. **Unresolved tool intents**: a tool use has no correlated tool result
//! 3. **Empty narrative**: blank text alongside tool activity
//! 4. Otherwise the turn is final

use std::collections::BTreeSet;

use cortex_core::TurnResult;

/// Outcome of the continuation predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Rule 1 fired for this SQL.
    PendingSql(String),
    /// Rule 2 fired.
    UnresolvedTools,
    /// Rule 3 fired.
    EmptyNarrative,
    /// No rule fired.
    Done,
}

impl Decision {
    /// Whether another round is needed.
    pub fn needs_continuation(&self) -> bool {
        !matches!(self, Self::Done)
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PendingSql(_) => "pending_sql",
            Self::UnresolvedTools => "unresolved_tools",
            Self::EmptyNarrative => "empty_narrative",
            Self::Done => "done",
        }
    }

    /// The pending SQL, when rule 1 fired.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::PendingSql(sql) => Some(sql.as_str()),
            _ => None,
        }
    }
}

/// Evaluate the continuation predicate.
pub fn decide(turn: &TurnResult, sql_exec_tool: &str) -> Decision {
    if let Some(sql) = pending_sql(turn, sql_exec_tool) {
        return Decision::PendingSql(sql.to_owned());
    }
    if !turn.unresolved_tool_uses().is_empty() {
        return Decision::UnresolvedTools;
    }
    if !turn.has_text() && turn.has_tool_activity() {
        return Decision::EmptyNarrative;
    }
    Decision::Done
}

/// First SQL carried by a successful tool result that has not been executed.
///
/// SQL counts as executed when a tool use named `sql_exec_tool` with the
/// same `input.sql` is already resolved within the turn.
pub fn pending_sql<'a>(turn: &'a TurnResult, sql_exec_tool: &str) -> Option<&'a str> {
    turn.tool_results
        .iter()
        .filter(|result| result.is_success())
        .filter_map(|result| result.sql())
        .find(|sql| !was_executed(turn, sql, sql_exec_tool))
}

fn was_executed(turn: &TurnResult, sql: &str, sql_exec_tool: &str) -> bool {
    turn.tool_uses.iter().any(|tool_use| {
        tool_use.name == sql_exec_tool
            && tool_use.input_sql() == Some(sql)
            && turn.is_resolved(&tool_use.id)
    })
}

/// Canonical set of tool names still unresolved after the turn.
pub fn pending_signature(turn: &TurnResult) -> BTreeSet<String> {
    turn.unresolved_tool_uses()
        .into_iter()
        .map(|tool_use| tool_use.name.clone())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
