//! Event delivery seam between the session task and the host application.
//!
//! [`ProgressSink`] is the three-callback contract the UI layer implements.
//! Two ready-made sinks cover the common cases: [`CallbackSink`] wraps plain
//! closures, and [`ChannelSink`] forwards everything as a single tagged
//! [`ProgressEvent`] stream for consumers that prefer pattern matching.

use std::sync::Arc;

use async_trait::async_trait;
use parsetrack_core::{ProgressUpdate, ResumeId};
use tokio::sync::mpsc;

/// Receives the typed events of one subscription.
///
/// Methods are invoked from the session task, in order, one at a time. After
/// a terminal event (`on_completed`, or `on_error` for a terminal failure)
/// or a completed `disconnect()`, no further methods are invoked.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// A progress update arrived (`connected` or `progress` message).
    async fn on_progress(&self, update: ProgressUpdate);

    /// Parsing finished; the resume is available.
    async fn on_completed(&self, resume_id: ResumeId);

    /// A failure was reported. Transport errors may be followed by further
    /// events if the session reconnects; all other errors are terminal.
    async fn on_error(&self, message: String);
}

/// One subscription event as a tagged union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A progress update.
    Progress(ProgressUpdate),
    /// Parsing finished.
    Completed(ResumeId),
    /// A failure was reported.
    Error(String),
}

/// Sink that forwards events onto an unbounded channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver for its events.
    ///
    /// The receiver yields `None` once the session ends and the sink is
    /// dropped.
    #[must_use]
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn on_progress(&self, update: ProgressUpdate) {
        let _ = self.tx.send(ProgressEvent::Progress(update));
    }

    async fn on_completed(&self, resume_id: ResumeId) {
        let _ = self.tx.send(ProgressEvent::Completed(resume_id));
    }

    async fn on_error(&self, message: String) {
        let _ = self.tx.send(ProgressEvent::Error(message));
    }
}

type ProgressFn = Box<dyn Fn(ProgressUpdate) + Send + Sync>;
type CompletedFn = Box<dyn Fn(ResumeId) + Send + Sync>;
type ErrorFn = Box<dyn Fn(String) + Send + Sync>;

/// Sink that invokes plain closures, mirroring the three-callback shape
/// mobile clients use.
pub struct CallbackSink {
    on_progress: ProgressFn,
    on_completed: CompletedFn,
    on_error: ErrorFn,
}

impl CallbackSink {
    /// Wrap three callbacks into a sink.
    pub fn new(
        on_progress: impl Fn(ProgressUpdate) + Send + Sync + 'static,
        on_completed: impl Fn(ResumeId) + Send + Sync + 'static,
        on_error: impl Fn(String) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            on_progress: Box::new(on_progress),
            on_completed: Box::new(on_completed),
            on_error: Box::new(on_error),
        })
    }
}

#[async_trait]
impl ProgressSink for CallbackSink {
    async fn on_progress(&self, update: ProgressUpdate) {
        (self.on_progress)(update);
    }

    async fn on_completed(&self, resume_id: ResumeId) {
        (self.on_completed)(resume_id);
    }

    async fn on_error(&self, message: String) {
        (self.on_error)(message);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
