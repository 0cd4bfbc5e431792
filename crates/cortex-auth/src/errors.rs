//! Auth error types.

/// Errors that can occur while producing credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The private key file could not be read.
    #[error("failed to read private key {path}: {reason}")]
    KeyRead {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        reason: String,
    },

    /// The private key was not a valid RSA PEM.
    #[error("failed to parse private key: {reason}")]
    KeyParse {
        /// Parser error.
        reason: String,
    },

    /// Signing the JWT failed.
    #[error("failed to sign JWT: {reason}")]
    JwtSign {
        /// Signer error.
        reason: String,
    },

    /// A required credential field is empty.
    #[error("credential not configured: {0}")]
    NotConfigured(&'static str),
}

impl AuthError {
    /// Stable category string for logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::KeyRead { .. } => "key_read",
            Self::KeyParse { .. } => "key_parse",
            Self::JwtSign { .. } => "jwt_sign",
            Self::NotConfigured(_) => "not_configured",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
