//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the JSON wire
//! format shared with the mobile clients. Each type implements [`Default`]
//! with production default values, and `#[serde(default)]` allows partial
//! JSON so missing fields fall back to defaults during deserialization.

use parsetrack_core::ReconnectPolicy;
use serde::{Deserialize, Serialize};

/// Root settings type for the parsetrack client.
///
/// Loaded from `~/.parsetrack/settings.json` with defaults applied for
/// missing fields. Environment variables can override specific values.
///
/// # JSON Format
///
/// ```json
/// {
///   "version": "0.1.0",
///   "api": { "baseUrl": "https://api.parsetrack.dev" },
///   "reconnect": { "maxAttempts": 3, "delayMs": 2000 }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Backend API settings.
    pub api: ApiSettings,
    /// Reconnect policy for the progress channel.
    pub reconnect: ReconnectPolicy,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "parsetrack".to_string(),
            api: ApiSettings::default(),
            reconnect: ReconnectPolicy::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Backend API settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base API URL. The progress channel URL is derived from it by
    /// rewriting the scheme to `ws`/`wss`.
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.parsetrack.dev".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default tracing filter when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings: ClientSettings =
            serde_json::from_str(r#"{"api":{"baseUrl":"http://localhost:8000"}}"#).unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.version, "0.1.0");
        assert_eq!(settings.reconnect.max_attempts, 3);
    }

    #[test]
    fn serializes_camel_case() {
        let settings = ClientSettings::default();
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json["api"]["baseUrl"].is_string());
        assert!(json["reconnect"]["maxAttempts"].is_number());
        assert!(json["reconnect"]["delayMs"].is_number());
    }

    #[test]
    fn round_trip_preserves_values() {
        let mut settings = ClientSettings::default();
        settings.api.base_url = "http://localhost:9000".into();
        settings.reconnect.delay_ms = 250;
        let json = serde_json::to_string(&settings).unwrap();
        let back: ClientSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api.base_url, "http://localhost:9000");
        assert_eq!(back.reconnect.delay_ms, 250);
    }
}
