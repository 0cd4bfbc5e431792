//! Agent transport errors and API error body parsing.

use cortex_auth::AuthError;
use serde_json::Value;

/// Errors from a single agent round trip.
///
/// Any of these aborts the whole continuation loop.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No bearer token could be produced.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// The endpoint returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
        /// Server error code, when present.
        code: Option<String>,
    },

    /// Request serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Error category string for logs.
    pub fn category(&self) -> &str {
        match self {
            Self::Http(_) => "network",
            Self::Auth(_) => "auth",
            Self::Api { .. } => "api",
            Self::Json(_) => "parse",
        }
    }
}

/// Parsed API error information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiErrorInfo {
    /// Human-readable error message.
    pub message: String,
    /// Server error code (`"390144"`, `"399504"`, ...).
    pub code: Option<String>,
}

/// Parse an error response body.
///
/// Handles `{"message", "code"}` (the REST API shape) and
/// `{"error": {"message", "code"}}`, falling back to the raw body.
pub fn parse_api_error(body: &str, status: u16) -> ApiErrorInfo {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return ApiErrorInfo {
            message: format!("HTTP {status}: {body}"),
            code: None,
        };
    };

    let envelope = if json["error"].is_object() {
        &json["error"]
    } else {
        &json
    };
    let code = match &envelope["code"] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    match envelope["message"].as_str() {
        Some(message) => ApiErrorInfo {
            message: message.to_string(),
            code,
        },
        None => ApiErrorInfo {
            message: format!("HTTP {status}: {body}"),
            code,
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
