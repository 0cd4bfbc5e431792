//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` for the JSON file
//! format. Each type implements [`Default`] with production default values,
//! and `#[serde(default)]` allows partial JSON: missing fields get their
//! default value during deserialization.

mod agent;
mod augmenter;
mod snowflake;

pub use agent::*;
pub use augmenter::*;
pub use snowflake::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "snowflake": { "account": "MYORG-MYACCOUNT", "user": "ANALYST" },
///   "agent": { "maxIterations": 5 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CortexSettings {
    /// Account, credentials, and session context.
    pub snowflake: SnowflakeSettings,
    /// Agent endpoint, model, and tool wiring.
    pub agent: AgentSettings,
    /// Table augmentation of final answers.
    pub augmenter: AugmenterSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl CortexSettings {
    /// Check that every required field is present and values are in range.
    ///
    /// All missing fields are reported together.
    pub fn validate(&self) -> Result<()> {
        let required: [(&'static str, &str); 6] = [
            ("snowflake.account", &self.snowflake.account),
            ("snowflake.host", &self.snowflake.host),
            ("agent.endpoint", &self.agent.endpoint),
            ("snowflake.privateKeyPath", &self.snowflake.private_key_path),
            ("snowflake.user", &self.snowflake.user),
            ("snowflake.role", &self.snowflake.role),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(SettingsError::Missing(missing));
        }
        if self.agent.max_iterations == 0 {
            return Err(SettingsError::InvalidValue(
                "agent.maxIterations must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Redacted connection summary for debug logging.
    ///
    /// Never includes key material.
    pub fn connection_info(&self) -> serde_json::Value {
        serde_json::json!({
            "account": self.snowflake.account,
            "host": self.snowflake.host,
            "agentEndpoint": self.agent.endpoint,
            "user": self.snowflake.user,
            "role": self.snowflake.role,
            "warehouse": self.snowflake.warehouse,
            "database": self.snowflake.database,
            "schema": self.snowflake.schema,
            "model": self.agent.model,
        })
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level or `EnvFilter` directive.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
