//! Error types for the progress client.
//!
//! Only precondition failures surface as `Err` from the public API; every
//! transport-level failure is delivered asynchronously through the
//! subscriber's error callback as a human-readable string.

use thiserror::Error;

/// Errors returned synchronously by the subscription API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// `subscribe` was called with an empty task ID.
    #[error("task id must not be empty")]
    EmptyTaskId,

    /// `subscribe` was called with an empty token.
    #[error("token must not be empty")]
    EmptyToken,

    /// The configured base API URL could not be turned into a channel URL.
    #[error("invalid base URL `{base}`: {reason}")]
    InvalidBaseUrl {
        /// The offending base URL.
        base: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for subscription operations.
pub type Result<T> = std::result::Result<T, ClientError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
