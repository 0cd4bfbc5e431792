//! The query engine trait and its result type.

use async_trait::async_trait;
use cortex_core::QueryId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::QueryError;

/// Bounded slice of a query result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Rows, each with one value per column. `null` for SQL NULL.
    pub rows: Vec<Vec<Value>>,
    /// Total rows the query produced, which may exceed `rows.len()`.
    pub total_rows: usize,
}

impl QueryResult {
    /// Whether there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

/// Executes SQL and reads results back by query id.
///
/// Implementations never retry internally.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Run `sql` and return the id of the executed query.
    async fn execute(&self, sql: &str) -> Result<QueryId, QueryError>;

    /// Read up to `limit` rows of a prior result.
    ///
    /// Returns `None` on any failure.
    async fn fetch(&self, query_id: &QueryId, limit: usize) -> Option<QueryResult>;
}

/// Check that a query id is safe to interpolate into SQL.
pub fn validate_query_id(query_id: &str) -> Result<(), QueryError> {
    let valid = !query_id.is_empty()
        && query_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier(query_id.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
