//! # cortex-auth
//!
//! Credentials for the agent and SQL REST endpoints.
//!
//! Two providers implement [`CredentialProvider`]:
//! - [`KeyPairJwtProvider`]: RS256 key-pair JWT, cached and re-signed before expiry
//! - [`StaticCredentialProvider`]: a fixed token (tests, pre-issued tokens)
//!
//! # Example
//!
//! ```no_run
//! use cortex_auth::{CredentialProvider, KeyPairJwtProvider};
//!
//! let settings = cortex_settings::load_settings().unwrap();
//! let provider = KeyPairJwtProvider::from_settings(&settings.snowflake).unwrap();
//! let token = provider.bearer_token().unwrap();
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod keypair;
pub mod provider;

pub use errors::AuthError;
pub use keypair::{KeyPairJwtProvider, qualified_username};
pub use provider::{
    CredentialProvider, KEYPAIR_JWT_TOKEN_TYPE, OAUTH_TOKEN_TYPE, StaticCredentialProvider,
};
