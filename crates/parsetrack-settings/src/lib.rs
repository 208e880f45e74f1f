//! # parsetrack-settings
//!
//! Configuration management with layered sources for the parsetrack client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`ClientSettings::default()`]
//! 2. **User file**: `~/.parsetrack/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `PARSETRACK_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use parsetrack_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("API base URL: {}", settings.api.base_url);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton.
///
/// Initialized on first access via [`get_settings`]. Falls back to compiled
/// defaults if loading fails.
static SETTINGS: OnceLock<ClientSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.parsetrack/settings.json` with env
/// var overrides. On subsequent calls, returns the cached value.
pub fn get_settings() -> &'static ClientSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: ClientSettings) -> std::result::Result<(), ClientSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = ClientSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn deep_merge_re_exported() {
        let a = serde_json::json!({"x": 1});
        let b = serde_json::json!({"y": 2});
        let merged = deep_merge(a, b);
        assert_eq!(merged["x"], 1);
        assert_eq!(merged["y"], 2);
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = ClientSettings::default();
        assert_eq!(settings.version, "0.1.0");
        assert_eq!(settings.name, "parsetrack");
        assert_eq!(settings.api.base_url, "https://api.parsetrack.dev");
        assert_eq!(settings.reconnect.max_attempts, 3);
        assert_eq!(settings.reconnect.delay_ms, 2000);
        assert_eq!(settings.logging.filter, "info");
    }
}
