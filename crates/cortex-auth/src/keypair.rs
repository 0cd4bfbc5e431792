//! RS256 key-pair JWT signing.
//!
//! Claims follow the key-pair authentication contract:
//! - `iss`: `ACCOUNT.USER.SHA256:<fingerprint>`
//! - `sub`: `ACCOUNT.USER`
//! - `iat` / `exp`: issued-at and issued-at plus 59 minutes
//!
//! Tokens are cached and re-signed once they are older than
//! [`REFRESH_AFTER`].

use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use cortex_settings::SnowflakeSettings;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AuthError;
use crate::provider::{CredentialProvider, KEYPAIR_JWT_TOKEN_TYPE};

/// JWT lifetime. The server rejects tokens valid for more than one hour.
const TOKEN_LIFETIME_SECS: i64 = 59 * 60;

/// Age after which a cached token is re-signed.
pub const REFRESH_AFTER: Duration = Duration::from_secs(55 * 60);

/// JWT claims for key-pair authentication.
#[derive(Debug, Serialize, Deserialize)]
struct KeyPairClaims {
    iss: String,
    sub: String,
    iat: i64,
    exp: i64,
}

struct CachedToken {
    token: String,
    created_at: Instant,
}

/// Signs key-pair JWTs for one account user.
pub struct KeyPairJwtProvider {
    qualified_user: String,
    fingerprint: String,
    encoding_key: EncodingKey,
    cached_token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for KeyPairJwtProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairJwtProvider")
            .field("qualified_user", &self.qualified_user)
            .finish_non_exhaustive()
    }
}

impl KeyPairJwtProvider {
    /// Build a provider from a PEM-encoded RSA private key.
    pub fn new(
        account: &str,
        user: &str,
        fingerprint: &str,
        private_key_pem: &[u8],
    ) -> Result<Self, AuthError> {
        if account.trim().is_empty() {
            return Err(AuthError::NotConfigured("account"));
        }
        if user.trim().is_empty() {
            return Err(AuthError::NotConfigured("user"));
        }
        let fingerprint = fingerprint.trim();
        let fingerprint = fingerprint.strip_prefix("SHA256:").unwrap_or(fingerprint);
        if fingerprint.is_empty() {
            return Err(AuthError::NotConfigured("public key fingerprint"));
        }

        let encoding_key =
            EncodingKey::from_rsa_pem(private_key_pem).map_err(|e| AuthError::KeyParse {
                reason: e.to_string(),
            })?;

        Ok(Self {
            qualified_user: qualified_username(account, user),
            fingerprint: fingerprint.to_string(),
            encoding_key,
            cached_token: Mutex::new(None),
        })
    }

    /// Build a provider from a private key file.
    pub fn from_key_file(
        account: &str,
        user: &str,
        fingerprint: &str,
        path: &Path,
    ) -> Result<Self, AuthError> {
        let pem = std::fs::read(path).map_err(|e| AuthError::KeyRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let provider = Self::new(account, user, fingerprint, &pem)?;
        info!(user = %provider.qualified_user, "key-pair credentials loaded");
        Ok(provider)
    }

    /// Build a provider from the connection settings.
    pub fn from_settings(settings: &SnowflakeSettings) -> Result<Self, AuthError> {
        if settings.private_key_path.trim().is_empty() {
            return Err(AuthError::NotConfigured("private key path"));
        }
        Self::from_key_file(
            &settings.account,
            &settings.user,
            &settings.public_key_fingerprint,
            Path::new(&settings.private_key_path),
        )
    }

    /// `ACCOUNT.USER`, the JWT subject.
    pub fn subject(&self) -> &str {
        &self.qualified_user
    }

    /// `ACCOUNT.USER.SHA256:<fingerprint>`, the JWT issuer.
    pub fn issuer(&self) -> String {
        format!("{}.SHA256:{}", self.qualified_user, self.fingerprint)
    }

    /// Sign a fresh token issued at `iat` (Unix seconds).
    fn sign(&self, iat: i64) -> Result<String, AuthError> {
        let claims = KeyPairClaims {
            iss: self.issuer(),
            sub: self.qualified_user.clone(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key).map_err(
            |e| AuthError::JwtSign {
                reason: e.to_string(),
            },
        )
    }
}

impl CredentialProvider for KeyPairJwtProvider {
    fn bearer_token(&self) -> Result<String, AuthError> {
        let mut cached = self
            .cached_token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(ref token) = *cached {
            if token.created_at.elapsed() < REFRESH_AFTER {
                return Ok(token.token.clone());
            }
        }

        debug!(user = %self.qualified_user, "signing key-pair JWT");
        let jwt = self.sign(chrono::Utc::now().timestamp())?;
        *cached = Some(CachedToken {
            token: jwt.clone(),
            created_at: Instant::now(),
        });
        Ok(jwt)
    }

    fn token_type(&self) -> &'static str {
        KEYPAIR_JWT_TOKEN_TYPE
    }
}

/// Upper-cased `ACCOUNT.USER`.
///
/// A region or cloud suffix on the account (`acct.us-east-1`) is dropped.
pub fn qualified_username(account: &str, user: &str) -> String {
    let account = account.trim();
    let account = account.split('.').next().unwrap_or(account);
    format!(
        "{}.{}",
        account.to_uppercase(),
        user.trim().to_uppercase()
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
