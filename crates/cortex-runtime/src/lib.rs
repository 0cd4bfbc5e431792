//! # cortex-runtime
//!
//! Drives a question to a complete answer across as many agent round trips
//! as the agent's tool intents require.
//!
//! - **Decision**: the continuation predicate over one [`TurnResult`](cortex_core::TurnResult)
//! - **Cycle detector**: pending-tool signatures already seen this run
//! - **Follow-up**: the correlated assistant/user turn pair for the next round
//! - **Engine**: the round loop, bounded by `max_iterations` and the cycle detector
//! - **Combiner**: all rounds folded into one [`CombinedResponse`](cortex_core::CombinedResponse)
//! - **Augmenter**: deferred table references replaced with fetched rows
//! - **Analyst**: the facade wiring the above per conversation

#![deny(unsafe_code)]

pub mod analyst;
pub mod augmenter;
pub mod combiner;
pub mod context;
pub mod cycle;
pub mod decision;
pub mod engine;
pub mod errors;
pub mod follow_up;
pub mod render;

#[cfg(test)]
mod test_support;

pub use analyst::{CortexAnalyst, SQL_PROMPT_PREFIX};
pub use augmenter::TableAugmenter;
pub use combiner::combine;
pub use context::{Conversation, ConversationContext};
pub use cycle::CycleDetector;
pub use decision::{Decision, decide, pending_signature, pending_sql};
pub use engine::{ContinuationEngine, ContinuationOutcome, EngineConfig, SqlExecution};
pub use errors::EngineError;
pub use follow_up::{FollowUpPlan, SqlCall, plan_follow_up};
pub use render::{render_block, render_table};
