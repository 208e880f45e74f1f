//! Reconnect policy for abnormal closures.
//!
//! The server owns parsing state, so the client recovers from transient
//! disconnects by simply reopening the channel after a fixed delay. The
//! delay is deliberately not exponential: a parsing task lives for seconds,
//! and the budget is small.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum reconnect attempts per session.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between reconnect attempts in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 2000;

/// Reconnection parameters applied after an abnormal closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconnectPolicy {
    /// Maximum number of reconnect attempts (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay before each attempt in ms (default: 2000).
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl ReconnectPolicy {
    /// The fixed backoff delay as a [`Duration`].
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_defaults() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_ms, 2000);
        assert_eq!(policy.delay(), Duration::from_millis(2000));
    }

    #[test]
    fn policy_serde_round_trip() {
        let policy = ReconnectPolicy {
            max_attempts: 5,
            delay_ms: 500,
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("maxAttempts"));
        let back: ReconnectPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn policy_serde_defaults_for_missing_fields() {
        let policy: ReconnectPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_ms, 2000);

        let partial: ReconnectPolicy = serde_json::from_str(r#"{"delayMs":100}"#).unwrap();
        assert_eq!(partial.max_attempts, 3);
        assert_eq!(partial.delay_ms, 100);
    }
}
