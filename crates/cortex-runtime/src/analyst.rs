//! # Analyst facade
//!
//! [`CortexAnalyst`] wires the continuation engine, combiner, and table
//! augmenter behind four entry points:
//!
//! - [`CortexAnalyst::ask`]: one question within a multi-turn conversation
//! - [`CortexAnalyst::analyze`]: a single stand-alone question
//! - [`CortexAnalyst::execute_sql`]: ask the agent to run and explain SQL
//! - [`CortexAnalyst::run`]: an explicit message list

use std::sync::Arc;

use cortex_agent::{AgentRequestTemplate, AgentTransport, RequestOptions};
use cortex_core::text::is_blank;
use cortex_core::{CombinedResponse, ConversationInput, Message};
use cortex_settings::CortexSettings;
use cortex_sql::QueryEngine;
use tracing::{debug, instrument};

use crate::augmenter::TableAugmenter;
use crate::combiner::combine;
use crate::context::{Conversation, ConversationContext};
use crate::engine::{ContinuationEngine, EngineConfig};
use crate::errors::EngineError;

/// Prefix of the question sent by [`CortexAnalyst::execute_sql`].
pub const SQL_PROMPT_PREFIX: &str = "Execute this SQL query: ";

/// Question-to-answer facade over one agent and one query engine.
#[derive(Debug)]
pub struct CortexAnalyst {
    engine: ContinuationEngine,
    augmenter: TableAugmenter,
    template: AgentRequestTemplate,
}

impl CortexAnalyst {
    /// Analyst configured from settings.
    pub fn new(
        agent: Arc<dyn AgentTransport>,
        executor: Arc<dyn QueryEngine>,
        settings: &CortexSettings,
    ) -> Self {
        Self {
            engine: ContinuationEngine::new(
                agent,
                executor.clone(),
                EngineConfig::from_settings(&settings.agent),
            ),
            augmenter: TableAugmenter::new(executor, settings.augmenter.clone()),
            template: AgentRequestTemplate::from_settings(&settings.agent),
        }
    }

    /// Apply per-call request overrides to every request this analyst sends.
    #[must_use]
    pub fn with_options(mut self, options: &RequestOptions) -> Self {
        self.template = self.template.with_options(options);
        self
    }

    /// Answer an explicit conversation.
    pub async fn run(
        &self,
        input: impl Into<ConversationInput>,
        context: &mut ConversationContext,
    ) -> Result<CombinedResponse, EngineError> {
        let (response, _) = self.respond(input.into().into_messages(), context).await?;
        Ok(response)
    }

    /// Answer `question` in the context of `conversation`.
    ///
    /// On success the question and the answer's narrative are appended to
    /// the conversation history. Appended table blocks are not.
    #[instrument(skip_all, fields(history = conversation.messages.len()))]
    pub async fn ask(
        &self,
        conversation: &mut Conversation,
        question: &str,
    ) -> Result<CombinedResponse, EngineError> {
        let mut messages = conversation.messages.clone();
        messages.push(Message::user_text(question));

        let (response, narrative) = self.respond(messages, &mut conversation.context).await?;

        conversation.messages.push(Message::user_text(question));
        if !is_blank(&narrative) {
            conversation.messages.push(Message::assistant_text(narrative));
        }
        Ok(response)
    }

    /// Answer a single question with no history.
    pub async fn analyze(&self, question: &str) -> Result<CombinedResponse, EngineError> {
        self.run(question, &mut ConversationContext::new()).await
    }

    /// Ask the agent to execute `sql` and explain the result.
    pub async fn execute_sql(&self, sql: &str) -> Result<CombinedResponse, EngineError> {
        self.analyze(&format!("{SQL_PROMPT_PREFIX}{sql}")).await
    }

    async fn respond(
        &self,
        messages: Vec<Message>,
        context: &mut ConversationContext,
    ) -> Result<(CombinedResponse, String), EngineError> {
        context.begin_request();
        let outcome = self.engine.run(&self.template, messages).await?;
        for execution in &outcome.executions {
            context.record_execution(execution);
        }

        let combined = combine(
            outcome.rounds,
            outcome.sqls_discovered,
            &context.request_query_ids,
            outcome.termination,
        );
        debug!(
            iterations = combined.iterations_performed,
            termination = ?combined.termination,
            query_ids = combined.query_ids.len(),
            "response combined"
        );

        let narrative = combined.text.clone();
        let response = self.augmenter.augment(combined, context).await;
        Ok((response, narrative))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
