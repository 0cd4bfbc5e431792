//! # cortex-settings
//!
//! Configuration management with layered sources for the Cortex agent client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`CortexSettings::default()`]
//! 2. **User file**: `~/.cortex/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `CORTEX_*` overrides (highest priority)
//!
//! Loaded settings are checked with [`CortexSettings::validate`] before use;
//! every missing connection field is reported at once.
//!
//! # Usage
//!
//! ```no_run
//! use cortex_settings::load_settings;
//!
//! let settings = load_settings().unwrap();
//! settings.validate().unwrap();
//! println!("agent endpoint: {}", settings.agent.endpoint);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides_from, deep_merge, load_settings,
    load_settings_from_path, settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = CortexSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn default_settings_values() {
        let settings = CortexSettings::default();
        assert_eq!(settings.agent.max_iterations, 10);
        assert_eq!(settings.agent.text_to_sql_tool, "DATA_BETA");
        assert_eq!(settings.agent.sql_exec_tool, "sql_execution_tool");
        assert!(!settings.agent.enable_chart_tool);
        assert_eq!(settings.augmenter.max_rows, 50);
        assert_eq!(settings.augmenter.max_column_width, 30);
        assert_eq!(settings.augmenter.markers.len(), 6);
        assert_eq!(settings.logging.level, "warn");
    }
}
