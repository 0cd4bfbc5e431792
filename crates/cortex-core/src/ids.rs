//! Identifiers.
//!
//! [`QueryId`] is the opaque handle the query engine returns after executing
//! SQL. Tool use IDs synthesized by the client and pseudo query IDs used when
//! execution fails are generated here.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque query engine execution handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(String);

impl QueryId {
    /// Create from an existing string value.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Generate a local pseudo identifier (26 hex chars).
    ///
    /// Used in place of a real handle when execution fails, so the
    /// conversation can still progress.
    #[must_use]
    pub fn pseudo() -> Self {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(26);
        Self(hex)
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::ops::Deref for QueryId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for QueryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for QueryId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Generate a fresh tool use ID (`tool_` + 8 random hex chars).
#[must_use]
pub fn new_tool_use_id() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(8);
    format!("tool_{hex}")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
