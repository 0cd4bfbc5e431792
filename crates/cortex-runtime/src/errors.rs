//! Engine error types.

use cortex_agent::AgentError;

/// Errors that abort a continuation run.
///
/// Only agent round-trip failures are fatal; SQL execution and result
/// fetch failures degrade instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An agent round trip failed.
    #[error("agent round {round} failed: {source}")]
    Agent {
        /// Round that failed (1-based).
        round: u32,
        /// Transport error.
        #[source]
        source: AgentError,
    },
}

impl EngineError {
    /// Error category string for logs.
    pub fn category(&self) -> &str {
        match self {
            Self::Agent { source, .. } => source.category(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
