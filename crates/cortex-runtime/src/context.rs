//! Per-conversation state.

use cortex_core::{Message, QueryId};

use crate::engine::SqlExecution;

/// State carried across requests of one conversation.
///
/// Owned by the caller and passed to each request explicitly, so
/// concurrent conversations never share it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationContext {
    /// Most recent query id the engine accepted, across requests.
    pub last_query_id: Option<QueryId>,
    /// Query ids accepted during the current request.
    pub request_query_ids: Vec<QueryId>,
}

impl ConversationContext {
    /// Fresh context with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request. `last_query_id` is kept.
    pub fn begin_request(&mut self) {
        self.request_query_ids.clear();
    }

    /// Record an execution. Pseudo ids from failed executions are ignored.
    pub fn record_execution(&mut self, execution: &SqlExecution) {
        if !execution.executed {
            return;
        }
        self.request_query_ids.push(execution.query_id.clone());
        self.last_query_id = Some(execution.query_id.clone());
    }
}

/// Message history plus its context, for multi-question sessions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conversation {
    /// Prior user questions and assistant answers.
    pub messages: Vec<Message>,
    /// Query id state.
    pub context: ConversationContext,
}

impl Conversation {
    /// Empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget history and query ids.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.context = ConversationContext::default();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
