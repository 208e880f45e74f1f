//! Wire protocol for the progress channel.
//!
//! The server sends one JSON object per event, tagged by a `type` field.
//! [`ServerMessage`] models the inbound envelope; [`ProgressUpdate`] is the
//! normalized payload handed to subscribers.
//!
//! Unrecognized `type` tags deserialize to [`ServerMessage::Unknown`] so a
//! newer server cannot break an older client; callers log and drop them.

use serde::{Deserialize, Serialize};

use crate::ids::{ResumeId, TaskId};

/// Stage reported while the server has not yet announced one.
pub const DEFAULT_STAGE: &str = "pending";

/// Human-readable label paired with [`DEFAULT_STAGE`].
pub const DEFAULT_STAGE_LABEL: &str = "Starting...";

/// Status carried by every `progress` message.
pub const STATUS_IN_PROGRESS: &str = "in_progress";

/// Fallback when the server reports an error without a message.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred during parsing";

/// One inbound event on the progress channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the channel opens. Stage fields may be absent when
    /// the task has not started yet.
    Connected {
        /// Task this channel reports on.
        task_id: TaskId,
        /// Current parsing stage, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        stage: Option<String>,
        /// Human-readable stage label.
        #[serde(skip_serializing_if = "Option::is_none")]
        stage_label: Option<String>,
        /// Percent complete (0-100).
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<u8>,
        /// Server-side task status (e.g. `pending`).
        status: String,
    },

    /// Periodic stage update while parsing runs.
    Progress {
        /// Task this channel reports on.
        task_id: TaskId,
        /// Current parsing stage (e.g. `ai_parsing`).
        stage: String,
        /// Human-readable stage label.
        stage_label: String,
        /// Percent complete (0-100).
        progress: u8,
        /// Optional free-form detail.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Parsing finished; the resume is available.
    Completed {
        /// Identifier of the parsed resume.
        resume_id: ResumeId,
    },

    /// Parsing failed server-side.
    Error {
        /// Human-readable failure description.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Any tag this client does not understand.
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Convert an informational message into the subscriber payload.
    ///
    /// `connected` fills defaults for the fields the server may omit;
    /// `progress` always reports an in-progress status. Terminal and unknown
    /// messages return `None`.
    #[must_use]
    pub fn into_update(self) -> Option<ProgressUpdate> {
        match self {
            Self::Connected {
                task_id,
                stage,
                stage_label,
                progress,
                status,
            } => Some(ProgressUpdate {
                task_id,
                stage: stage.unwrap_or_else(|| DEFAULT_STAGE.to_owned()),
                stage_label: stage_label.unwrap_or_else(|| DEFAULT_STAGE_LABEL.to_owned()),
                progress: progress.unwrap_or(0),
                message: None,
                status,
            }),
            Self::Progress {
                task_id,
                stage,
                stage_label,
                progress,
                message,
            } => Some(ProgressUpdate {
                task_id,
                stage,
                stage_label,
                progress,
                message,
                status: STATUS_IN_PROGRESS.to_owned(),
            }),
            Self::Completed { .. } | Self::Error { .. } | Self::Unknown => None,
        }
    }
}

/// Normalized progress payload delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Task the update belongs to.
    pub task_id: TaskId,
    /// Current parsing stage.
    pub stage: String,
    /// Human-readable stage label.
    pub stage_label: String,
    /// Percent complete (0-100).
    pub progress: u8,
    /// Optional free-form detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Task status (`pending`, `in_progress`, ...).
    pub status: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_connected_minimal() {
        let raw = r#"{"type":"connected","task_id":"abc123","status":"pending"}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Connected {
                task_id: TaskId::from("abc123"),
                stage: None,
                stage_label: None,
                progress: None,
                status: "pending".into(),
            }
        );
    }

    #[test]
    fn parse_connected_full() {
        let raw = r#"{"type":"connected","task_id":"t1","stage":"upload","stage_label":"Uploading","progress":10,"status":"in_progress"}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        let update = msg.into_update().unwrap();
        assert_eq!(update.stage, "upload");
        assert_eq!(update.stage_label, "Uploading");
        assert_eq!(update.progress, 10);
        assert_eq!(update.status, "in_progress");
    }

    #[test]
    fn connected_defaults_applied() {
        let msg = ServerMessage::Connected {
            task_id: TaskId::from("T1"),
            stage: None,
            stage_label: None,
            progress: None,
            status: "pending".into(),
        };
        let update = msg.into_update().unwrap();
        assert_eq!(update.stage, "pending");
        assert_eq!(update.stage_label, "Starting...");
        assert_eq!(update.progress, 0);
        assert_eq!(update.status, "pending");
        assert!(update.message.is_none());
    }

    #[test]
    fn parse_progress() {
        let raw = r#"{"type":"progress","task_id":"abc123","stage":"ai_parsing","stage_label":"AI parsing resume","progress":70}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        let update = msg.into_update().unwrap();
        assert_eq!(update.task_id.as_str(), "abc123");
        assert_eq!(update.stage, "ai_parsing");
        assert_eq!(update.progress, 70);
    }

    #[test]
    fn progress_forces_in_progress_status() {
        let msg = ServerMessage::Progress {
            task_id: TaskId::from("T1"),
            stage: "ocr".into(),
            stage_label: "Reading document".into(),
            progress: 30,
            message: Some("page 2 of 4".into()),
        };
        let update = msg.into_update().unwrap();
        assert_eq!(update.status, "in_progress");
        assert_eq!(update.message.as_deref(), Some("page 2 of 4"));
    }

    #[test]
    fn parse_completed() {
        let raw = r#"{"type":"completed","resume_id":"R99"}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Completed {
                resume_id: ResumeId::from("R99")
            }
        );
        assert!(msg.into_update().is_none());
    }

    #[test]
    fn parse_error_with_and_without_message() {
        let with: ServerMessage =
            serde_json::from_str(r#"{"type":"error","message":"bad pdf"}"#).unwrap();
        assert_eq!(
            with,
            ServerMessage::Error {
                message: Some("bad pdf".into())
            }
        );

        let without: ServerMessage = serde_json::from_str(r#"{"type":"error"}"#).unwrap();
        assert_eq!(without, ServerMessage::Error { message: None });
    }

    #[test]
    fn unknown_tag_parses_to_unknown() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type":"heartbeat","extra":true}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
        assert!(msg.into_update().is_none());
    }

    #[test]
    fn missing_tag_is_a_parse_error() {
        let result = serde_json::from_str::<ServerMessage>(r#"{"task_id":"t1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn non_json_is_a_parse_error() {
        let result = serde_json::from_str::<ServerMessage>("definitely not json");
        assert!(result.is_err());
    }

    #[test]
    fn update_serializes_camel_case() {
        let update = ProgressUpdate {
            task_id: TaskId::from("abc123"),
            stage: "ai_parsing".into(),
            stage_label: "AI parsing resume".into(),
            progress: 70,
            message: None,
            status: STATUS_IN_PROGRESS.to_owned(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["taskId"], "abc123");
        assert_eq!(json["stageLabel"], "AI parsing resume");
        assert_eq!(json["progress"], 70);
        assert!(json.get("message").is_none());
    }
}
