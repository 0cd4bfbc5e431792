//! The credential seam used by HTTP clients.

use crate::errors::AuthError;

/// Token type header value for key-pair JWTs.
pub const KEYPAIR_JWT_TOKEN_TYPE: &str = "KEYPAIR_JWT";

/// Token type header value for OAuth access tokens.
pub const OAUTH_TOKEN_TYPE: &str = "OAUTH";

/// Source of bearer tokens for outgoing requests.
///
/// Clients call [`bearer_token`](Self::bearer_token) once per request;
/// implementations decide whether to cache.
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token.
    fn bearer_token(&self) -> Result<String, AuthError>;

    /// Value of the `X-Snowflake-Authorization-Token-Type` header.
    fn token_type(&self) -> &'static str;
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticCredentialProvider {
    token: String,
    token_type: &'static str,
}

impl StaticCredentialProvider {
    /// Key-pair JWT that was signed elsewhere.
    pub fn keypair_jwt(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: KEYPAIR_JWT_TOKEN_TYPE,
        }
    }

    /// OAuth access token.
    pub fn oauth(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: OAUTH_TOKEN_TYPE,
        }
    }
}

impl std::fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialProvider")
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn bearer_token(&self) -> Result<String, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::NotConfigured("bearer token"));
        }
        Ok(self.token.clone())
    }

    fn token_type(&self) -> &'static str {
        self.token_type
    }
}
