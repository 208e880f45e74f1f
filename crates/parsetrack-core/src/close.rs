//! Close-code taxonomy for the progress channel.
//!
//! The server uses the normal closure code plus two application-defined
//! codes for authorization failures. Everything else counts as abnormal and
//! is subject to the reconnect policy.

/// Intentional closure, no error.
pub const CLOSE_NORMAL: u16 = 1000;

/// Application-defined: the token was missing, expired, or invalid.
pub const CLOSE_UNAUTHORIZED: u16 = 4001;

/// Application-defined: the task belongs to a different user.
pub const CLOSE_FORBIDDEN: u16 = 4003;

/// Reported when the channel closes with [`CLOSE_UNAUTHORIZED`].
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized - Please log in again";

/// Reported when the channel closes with [`CLOSE_FORBIDDEN`].
pub const FORBIDDEN_MESSAGE: &str = "Access denied - This task belongs to another user";

/// Classification of a WebSocket close code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseKind {
    /// Code 1000; terminate silently.
    Normal,
    /// Code 4001; terminal, report and never reconnect.
    Unauthorized,
    /// Code 4003; terminal, report and never reconnect.
    Forbidden,
    /// Any other code; eligible for reconnection.
    Abnormal,
}

impl CloseKind {
    /// Classify a raw close code.
    #[must_use]
    pub fn classify(code: u16) -> Self {
        match code {
            CLOSE_NORMAL => Self::Normal,
            CLOSE_UNAUTHORIZED => Self::Unauthorized,
            CLOSE_FORBIDDEN => Self::Forbidden,
            _ => Self::Abnormal,
        }
    }

    /// The message reported to subscribers for terminal authorization
    /// failures; `None` for normal and abnormal closures.
    #[must_use]
    pub fn terminal_message(self) -> Option<&'static str> {
        match self {
            Self::Unauthorized => Some(UNAUTHORIZED_MESSAGE),
            Self::Forbidden => Some(FORBIDDEN_MESSAGE),
            Self::Normal | Self::Abnormal => None,
        }
    }

    /// Whether this closure is subject to the reconnect policy.
    #[must_use]
    pub fn reconnects(self) -> bool {
        matches!(self, Self::Abnormal)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
