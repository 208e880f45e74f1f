//! Public subscription API.
//!
//! One [`ProgressSubscriber`] owns at most one live session. Subscribing
//! while a session is active shuts the old one down first, so a stale
//! channel can never keep delivering into a replaced sink.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use parsetrack_core::{ClientError, ReconnectPolicy, TaskId};

use crate::endpoint;
use crate::session;
use crate::sink::ProgressSink;

/// Configuration for a [`ProgressSubscriber`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base API URL the channel URL is derived from.
    pub base_url: String,
    /// Reconnect policy applied after abnormal closures.
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Config with the default reconnect policy.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// Handle to a running session task.
struct SessionHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

/// Subscribes to the progress channel of one parsing task at a time.
///
/// Instantiable: concurrent uploads each get their own subscriber, so one
/// task's lifecycle can never clobber another's callbacks.
pub struct ProgressSubscriber {
    config: ClientConfig,
    session: Mutex<Option<SessionHandle>>,
}

impl ProgressSubscriber {
    /// Create a subscriber with no active session.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    /// Open the progress channel for `task_id` and deliver events to `sink`.
    ///
    /// Returns as soon as the session task is spawned; every result after
    /// that arrives asynchronously through the sink. If a session is already
    /// active it is shut down first.
    ///
    /// # Errors
    ///
    /// Rejects empty task IDs/tokens and unusable base URLs. Transport
    /// failures never surface here.
    pub async fn subscribe(
        &self,
        task_id: TaskId,
        token: &str,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<(), ClientError> {
        let url = endpoint::progress_url(&self.config.base_url, &task_id, token)?;

        self.shutdown_current().await;

        debug!(task_id = %task_id, "starting progress subscription");
        let cancel = CancellationToken::new();
        let join = tokio::spawn(session::run(
            url,
            task_id,
            self.config.reconnect,
            sink,
            cancel.clone(),
        ));
        *self.session.lock() = Some(SessionHandle { cancel, join });
        Ok(())
    }

    /// Close the channel (normal closure) and drop the sink.
    ///
    /// Idempotent: safe to call with no session open. When this returns, the
    /// session task has fully stopped and no further sink methods will run;
    /// a reconnect scheduled during backoff is cancelled, not leaked.
    pub async fn disconnect(&self) {
        self.shutdown_current().await;
    }

    /// Whether a session task is currently running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.join.is_finished())
    }

    async fn shutdown_current(&self) {
        let handle = self.session.lock().take();
        if let Some(SessionHandle { cancel, join }) = handle {
            cancel.cancel();
            let _ = join.await;
        }
    }
}

impl Drop for ProgressSubscriber {
    fn drop(&mut self) {
        // Best effort: the session task observes the token at its next
        // await point. No close handshake from a sync drop.
        if let Some(handle) = self.session.get_mut().take() {
            handle.cancel.cancel();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ChannelSink;

    #[tokio::test]
    async fn disconnect_without_session_is_a_no_op() {
        let subscriber = ProgressSubscriber::new(ClientConfig::new("http://localhost:1"));
        subscriber.disconnect().await;
        subscriber.disconnect().await;
        assert!(!subscriber.is_active());
    }

    #[tokio::test]
    async fn subscribe_rejects_empty_task_id() {
        let subscriber = ProgressSubscriber::new(ClientConfig::new("http://localhost:1"));
        let (sink, _rx) = ChannelSink::new();
        let err = subscriber
            .subscribe(TaskId::from(""), "tok", sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::EmptyTaskId));
        assert!(!subscriber.is_active());
    }

    #[tokio::test]
    async fn subscribe_rejects_empty_token() {
        let subscriber = ProgressSubscriber::new(ClientConfig::new("http://localhost:1"));
        let (sink, _rx) = ChannelSink::new();
        let err = subscriber
            .subscribe(TaskId::from("t1"), "", sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::EmptyToken));
    }

    #[tokio::test]
    async fn subscribe_rejects_bad_base_url() {
        let subscriber = ProgressSubscriber::new(ClientConfig::new("ftp://example.com"));
        let (sink, _rx) = ChannelSink::new();
        let err = subscriber
            .subscribe(TaskId::from("t1"), "tok", sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn config_new_uses_default_policy() {
        let config = ClientConfig::new("http://localhost:8000");
        assert_eq!(config.reconnect, ReconnectPolicy::default());
        assert_eq!(config.base_url, "http://localhost:8000");
    }
}
