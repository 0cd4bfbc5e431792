//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`CortexSettings::default()`]
//! 2. If `~/.cortex/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `CORTEX_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::CortexSettings;

/// Resolve the path to the settings file (`~/.cortex/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".cortex").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<CortexSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error. Validation is left to the caller.
pub fn load_settings_from_path(path: &Path) -> Result<CortexSettings> {
    let defaults = serde_json::to_value(CortexSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: CortexSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = match target_map.remove(&key) {
                    Some(target_val) => deep_merge(target_val, source_val),
                    None => source_val,
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `CORTEX_*` environment variable overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut CortexSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Empty values are ignored. Invalid numeric or boolean values are logged
/// and ignored, leaving the file/default value in place.
pub fn apply_overrides_from<F>(settings: &mut CortexSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let string = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    // ── Connection ──────────────────────────────────────────────────
    if let Some(v) = string("CORTEX_ACCOUNT") {
        settings.snowflake.account = v;
    }
    if let Some(v) = string("CORTEX_HOST") {
        settings.snowflake.host = v;
    }
    if let Some(v) = string("CORTEX_USER") {
        settings.snowflake.user = v;
    }
    if let Some(v) = string("CORTEX_ROLE") {
        settings.snowflake.role = v;
    }
    if let Some(v) = string("CORTEX_WAREHOUSE") {
        settings.snowflake.warehouse = v;
    }
    if let Some(v) = string("CORTEX_DATABASE") {
        settings.snowflake.database = v;
    }
    if let Some(v) = string("CORTEX_SCHEMA") {
        settings.snowflake.schema = v;
    }
    if let Some(v) = string("CORTEX_PRIVATE_KEY_PATH") {
        settings.snowflake.private_key_path = v;
    }
    if let Some(v) = string("CORTEX_PUBLIC_KEY_FINGERPRINT") {
        settings.snowflake.public_key_fingerprint = v;
    }

    // ── Agent ───────────────────────────────────────────────────────
    if let Some(v) = string("CORTEX_AGENT_ENDPOINT") {
        settings.agent.endpoint = v;
    }
    if let Some(v) = string("CORTEX_MODEL") {
        settings.agent.model = v;
    }
    if let Some(v) = string("CORTEX_SEMANTIC_VIEW") {
        settings.agent.semantic_view = v;
    }
    if let Some(v) = string("CORTEX_MAX_ITERATIONS") {
        match parse_u32_range(&v, 1, 100) {
            Some(n) => settings.agent.max_iterations = n,
            None => warn!(key = "CORTEX_MAX_ITERATIONS", value = %v, "invalid integer env var, ignoring"),
        }
    }
    if let Some(v) = string("CORTEX_ENABLE_CHART") {
        match parse_bool(&v) {
            Some(b) => settings.agent.enable_chart_tool = b,
            None => warn!(key = "CORTEX_ENABLE_CHART", value = %v, "invalid boolean env var, ignoring"),
        }
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = string("CORTEX_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u32` within an inclusive range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.trim().parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"agent": {"model": "a", "maxIterations": 10}});
        let source = serde_json::json!({"agent": {"maxIterations": 4}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["agent"]["maxIterations"], 4);
        assert_eq!(merged["agent"]["model"], "a");
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1});
        let merged = deep_merge(target, serde_json::json!({"a": null}));
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn merge_replaces_arrays() {
        let target = serde_json::json!({"markers": ["x", "y"]});
        let merged = deep_merge(target, serde_json::json!({"markers": ["z"]}));
        assert_eq!(merged["markers"], serde_json::json!(["z"]));
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings.agent.sql_exec_tool, "sql_execution_tool");
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"snowflake": {"account": "ORG-ACCT", "warehouse": "WH"},
                "augmenter": {"maxRows": 5}}"#,
        )
        .unwrap();
        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.snowflake.account, "ORG-ACCT");
        assert_eq!(settings.snowflake.warehouse, "WH");
        assert_eq!(settings.snowflake.statement_timeout_secs, 60);
        assert_eq!(settings.augmenter.max_rows, 5);
        assert_eq!(settings.augmenter.max_column_width, 30);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_settings_from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    // ── overrides ───────────────────────────────────────────────────

    #[test]
    fn overrides_apply_connection_fields() {
        let mut settings = CortexSettings::default();
        apply_overrides_from(
            &mut settings,
            lookup(&[
                ("CORTEX_ACCOUNT", "ORG-ACCT"),
                ("CORTEX_HOST", "org-acct.snowflakecomputing.com"),
                ("CORTEX_AGENT_ENDPOINT", "https://example.test/agent:run"),
                ("CORTEX_USER", "svc"),
                ("CORTEX_ROLE", "ANALYST"),
                ("CORTEX_PRIVATE_KEY_PATH", "/keys/k.p8"),
            ]),
        );
        assert!(settings.validate().is_ok());
        assert_eq!(settings.snowflake.user, "svc");
    }

    #[test]
    fn empty_override_ignored() {
        let mut settings = CortexSettings::default();
        apply_overrides_from(&mut settings, lookup(&[("CORTEX_MODEL", "")]));
        assert_eq!(settings.agent.model, "llama3.1-70b");
    }

    #[test]
    fn max_iterations_out_of_range_ignored() {
        let mut settings = CortexSettings::default();
        apply_overrides_from(&mut settings, lookup(&[("CORTEX_MAX_ITERATIONS", "0")]));
        assert_eq!(settings.agent.max_iterations, 10);
        apply_overrides_from(&mut settings, lookup(&[("CORTEX_MAX_ITERATIONS", "101")]));
        assert_eq!(settings.agent.max_iterations, 10);
        apply_overrides_from(&mut settings, lookup(&[("CORTEX_MAX_ITERATIONS", "3")]));
        assert_eq!(settings.agent.max_iterations, 3);
    }

    #[test]
    fn chart_toggle_parses_bool() {
        let mut settings = CortexSettings::default();
        apply_overrides_from(&mut settings, lookup(&[("CORTEX_ENABLE_CHART", "yes")]));
        assert!(settings.agent.enable_chart_tool);
    }

    // ── parsers ─────────────────────────────────────────────────────

    #[test]
    fn parse_bool_variants() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn parse_u32_range_bounds() {
        assert_eq!(parse_u32_range("1", 1, 100), Some(1));
        assert_eq!(parse_u32_range("100", 1, 100), Some(100));
        assert_eq!(parse_u32_range("-1", 1, 100), None);
        assert_eq!(parse_u32_range("abc", 1, 100), None);
    }
}
