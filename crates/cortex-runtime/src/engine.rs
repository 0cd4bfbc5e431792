//! # Continuation engine
//!
//! Runs agent rounds until the continuation predicate says the answer is
//! complete, bounded by:
//!
//! - `max_iterations` round trips
//! - the cycle detector (a repeated pending-tool signature aborts)
//!
//! SQL execution failures never abort a run: the follow-up answers with a
//! pseudo query id instead. Agent failures abort the whole run.

use std::sync::Arc;

use cortex_agent::{AgentRequestTemplate, AgentTransport, aggregate, parse_event_stream};
use cortex_core::{Message, QueryId, Termination, ToolResult, TurnResult};
use cortex_settings::AgentSettings;
use cortex_sql::QueryEngine;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::cycle::CycleDetector;
use crate::decision::{decide, pending_signature};
use crate::errors::EngineError;
use crate::follow_up::{SqlCall, plan_follow_up};

/// Loop bounds and tool naming.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum agent round trips per run.
    pub max_iterations: u32,
    /// Name of the SQL execution tool.
    pub sql_exec_tool: String,
}

impl EngineConfig {
    /// Config from agent settings.
    pub fn from_settings(settings: &AgentSettings) -> Self {
        Self {
            max_iterations: settings.max_iterations,
            sql_exec_tool: settings.sql_exec_tool.clone(),
        }
    }
}

/// One SQL statement executed on the agent's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlExecution {
    /// Tool use answered.
    pub tool_use_id: String,
    /// Statement.
    pub sql: String,
    /// Real or pseudo query id.
    pub query_id: QueryId,
    /// Whether the engine accepted the statement.
    pub executed: bool,
}

/// Everything a run produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContinuationOutcome {
    /// One entry per round trip, in order.
    pub rounds: Vec<TurnResult>,
    /// Conversation including every appended follow-up turn.
    pub messages: Vec<Message>,
    /// SQL executions, in order.
    pub executions: Vec<SqlExecution>,
    /// SQL the agent generated in a tool result, in discovery order.
    pub sqls_discovered: Vec<String>,
    /// How the run ended.
    pub termination: Termination,
}

impl ContinuationOutcome {
    /// SQL generated by the agent and run on its behalf, in discovery
    /// order. Statements the agent asked to execute directly are excluded.
    pub fn sqls(&self) -> &[String] {
        &self.sqls_discovered
    }
}

/// Drives agent rounds and SQL execution for one request.
pub struct ContinuationEngine {
    agent: Arc<dyn AgentTransport>,
    executor: Arc<dyn QueryEngine>,
    config: EngineConfig,
}

impl std::fmt::Debug for ContinuationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinuationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContinuationEngine {
    /// Engine over the given agent transport and query engine.
    pub fn new(
        agent: Arc<dyn AgentTransport>,
        executor: Arc<dyn QueryEngine>,
        config: EngineConfig,
    ) -> Self {
        Self {
            agent,
            executor,
            config,
        }
    }

    /// Loop configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run rounds starting from `messages` until the answer is complete or
    /// a bound is hit.
    #[instrument(skip_all, fields(max_iterations = self.config.max_iterations))]
    pub async fn run(
        &self,
        template: &AgentRequestTemplate,
        messages: Vec<Message>,
    ) -> Result<ContinuationOutcome, EngineError> {
        let mut outcome = ContinuationOutcome {
            messages,
            ..ContinuationOutcome::default()
        };
        let mut cycles = CycleDetector::new();
        let mut round: u32 = 0;

        loop {
            round += 1;
            let request = template.build(outcome.messages.clone());
            let body = self
                .agent
                .send(&request)
                .await
                .map_err(|source| EngineError::Agent { round, source })?;
            let turn = aggregate(parse_event_stream(&body));

            let decision = decide(&turn, &self.config.sql_exec_tool);
            info!(
                round,
                max_iterations = self.config.max_iterations,
                decision = decision.label(),
                tool_uses = turn.tool_uses.len(),
                tool_results = turn.tool_results.len(),
                "agent round complete"
            );

            if !decision.needs_continuation() {
                outcome.rounds.push(turn);
                outcome.termination = Termination::Done;
                return Ok(outcome);
            }

            if !cycles.observe(pending_signature(&turn)) {
                warn!(round, "pending tool signature repeated, aborting loop");
                outcome.rounds.push(turn);
                outcome.termination = Termination::AbortedLoop;
                return Ok(outcome);
            }

            if round >= self.config.max_iterations {
                warn!(round, "iteration cap reached before completion");
                outcome.rounds.push(turn);
                outcome.termination = Termination::AbortedMaxIter;
                return Ok(outcome);
            }

            if let Some(sql) = decision.sql() {
                outcome.sqls_discovered.push(sql.to_owned());
            }
            let plan = plan_follow_up(&turn, decision.sql(), &self.config.sql_exec_tool);
            let mut results = Vec::with_capacity(plan.sql_calls.len());
            for call in &plan.sql_calls {
                let execution = self.execute(call).await;
                results.push(ToolResult::json(
                    execution.tool_use_id.clone(),
                    self.config.sql_exec_tool.clone(),
                    json!({ "query_id": execution.query_id }),
                ));
                outcome.executions.push(execution);
            }
            outcome.rounds.push(turn);

            let turns = plan.into_turns(results);
            if turns.is_empty() {
                warn!(round, "no follow-up progress possible, aborting loop");
                outcome.termination = Termination::AbortedLoop;
                return Ok(outcome);
            }
            outcome.messages.extend(turns);
        }
    }

    async fn execute(&self, call: &SqlCall) -> SqlExecution {
        match self.executor.execute(&call.sql).await {
            Ok(query_id) => {
                info!(tool_use_id = %call.tool_use_id, query_id = %query_id, "SQL executed");
                SqlExecution {
                    tool_use_id: call.tool_use_id.clone(),
                    sql: call.sql.clone(),
                    query_id,
                    executed: true,
                }
            }
            Err(e) => {
                let query_id = QueryId::pseudo();
                warn!(
                    tool_use_id = %call.tool_use_id,
                    error = %e,
                    category = e.category(),
                    pseudo_query_id = %query_id,
                    "SQL execution failed, answering with pseudo query id"
                );
                SqlExecution {
                    tool_use_id: call.tool_use_id.clone(),
                    sql: call.sql.clone(),
                    query_id,
                    executed: false,
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
