//! Query engine errors.

use cortex_auth::AuthError;

/// Errors from SQL execution.
///
/// The continuation engine treats all of these as non-fatal.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No bearer token could be produced.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// The SQL API rejected the statement.
    #[error("SQL API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Snowflake error code, when present.
        code: Option<String>,
        /// Error description.
        message: String,
    },

    /// A query id contained characters other than alphanumerics and `-`.
    #[error("invalid query id: {0:?}")]
    InvalidIdentifier(String),

    /// A success response carried no statement handle.
    #[error("response carried no statement handle")]
    MissingHandle,

    /// Response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    /// Error category string for logs.
    pub fn category(&self) -> &str {
        match self {
            Self::Http(_) => "network",
            Self::Auth(_) => "auth",
            Self::Api { .. } => "api",
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::MissingHandle | Self::Json(_) => "parse",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
