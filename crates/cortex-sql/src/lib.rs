//! # cortex-sql
//!
//! The query engine seam used by the continuation engine:
//!
//! - [`QueryEngine::execute`] runs SQL and returns its query id
//! - [`QueryEngine::fetch`] reads back a bounded slice of a prior result
//!
//! [`SnowflakeSqlApi`] implements it over `POST /api/v2/statements`.
//! Results are fetched with `RESULT_SCAN`, keyed by the statement handle.

#![deny(unsafe_code)]

pub mod engine;
pub mod errors;
pub mod snowflake;

pub use engine::{QueryEngine, QueryResult, validate_query_id};
pub use errors::QueryError;
pub use snowflake::{SessionContext, SnowflakeSqlApi};
