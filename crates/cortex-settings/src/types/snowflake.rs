//! Account and session context settings.

use serde::{Deserialize, Serialize};

/// Snowflake account, credentials, and session context.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnowflakeSettings {
    /// Account identifier (e.g. `MYORG-MYACCOUNT`).
    pub account: String,
    /// Account host (e.g. `myorg-myaccount.snowflakecomputing.com`).
    pub host: String,
    /// Login name of the key-pair user.
    pub user: String,
    /// Role for SQL execution.
    pub role: String,
    /// Warehouse for SQL execution.
    pub warehouse: String,
    /// Default database.
    pub database: String,
    /// Default schema.
    pub schema: String,
    /// Path to the PEM-encoded RSA private key.
    pub private_key_path: String,
    /// Base64 SHA-256 fingerprint of the registered public key
    /// (the value after `SHA256:` in `DESC USER`).
    pub public_key_fingerprint: String,
    /// Server-side statement timeout for SQL execution, in seconds.
    pub statement_timeout_secs: u64,
}

impl SnowflakeSettings {
    /// Base URL of the SQL REST API, derived from the host.
    pub fn api_base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.host.trim_end_matches('/'))
        }
    }
}

impl Default for SnowflakeSettings {
    fn default() -> Self {
        Self {
            account: String::new(),
            host: String::new(),
            user: String::new(),
            role: String::new(),
            warehouse: String::new(),
            database: String::new(),
            schema: String::new(),
            private_key_path: String::new(),
            public_key_fingerprint: String::new(),
            statement_timeout_secs: 60,
        }
    }
}
