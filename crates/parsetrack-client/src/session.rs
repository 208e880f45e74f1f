//! Connection lifecycle for one progress subscription.
//!
//! A session runs as a single spawned task that owns the socket end to end:
//! connect, read, dispatch, classify the close, and reconnect after abnormal
//! closures until the attempt budget runs out. Cancellation is observed at
//! every await point, including the backoff sleep, so a pending reconnect
//! can never fire after `disconnect()` has completed.

use std::sync::Arc;

use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use parsetrack_core::protocol::DEFAULT_ERROR_MESSAGE;
use parsetrack_core::{CloseKind, ReconnectPolicy, ServerMessage, TaskId};

use crate::sink::ProgressSink;

/// Reported when the transport fails before a close handshake completes.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error occurred";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How one connection attempt ended.
enum SessionEnd {
    /// Terminal: completed/error message, normal closure, or a terminal
    /// close code. No reconnection.
    Finished,
    /// The caller disconnected.
    Cancelled,
    /// Abnormal closure; eligible for reconnection.
    Abnormal,
}

/// Run one subscription session until it terminates.
///
/// Owns the sink for the lifetime of the session; dropping it on return is
/// what guarantees no further events after the session ends.
pub(crate) async fn run(
    url: Url,
    task_id: TaskId,
    policy: ReconnectPolicy,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
) {
    let mut attempts: u32 = 0;
    loop {
        let ws = tokio::select! {
            () = cancel.cancelled() => return,
            result = connect_async(url.as_str()) => match result {
                Ok((ws, _response)) => ws,
                Err(err) => {
                    warn!(task_id = %task_id, error = %err, "progress channel connect failed");
                    sink.on_error(CONNECTION_ERROR_MESSAGE.to_owned()).await;
                    if wait_for_retry(&policy, sink.as_ref(), &cancel, &mut attempts).await {
                        continue;
                    }
                    return;
                }
            },
        };

        info!(task_id = %task_id, "progress channel open");
        attempts = 0;

        match drive(ws, &task_id, sink.as_ref(), &cancel).await {
            SessionEnd::Finished | SessionEnd::Cancelled => return,
            SessionEnd::Abnormal => {
                if !wait_for_retry(&policy, sink.as_ref(), &cancel, &mut attempts).await {
                    return;
                }
            }
        }
    }
}

/// Read and dispatch frames until the connection ends one way or another.
async fn drive(
    mut ws: WsStream,
    task_id: &TaskId,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> SessionEnd {
    loop {
        let frame = tokio::select! {
            () = cancel.cancelled() => {
                let _ = ws.close(Some(normal_close())).await;
                return SessionEnd::Cancelled;
            }
            frame = ws.next() => frame,
        };

        match frame {
            None => {
                debug!(task_id = %task_id, "progress channel ended without close frame");
                return SessionEnd::Abnormal;
            }
            Some(Err(err)) => {
                warn!(task_id = %task_id, error = %err, "progress channel transport error");
                sink.on_error(CONNECTION_ERROR_MESSAGE.to_owned()).await;
                return SessionEnd::Abnormal;
            }
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerMessage>(&text) {
                Ok(message) => {
                    if let Some(end) = dispatch(message, &mut ws, task_id, sink).await {
                        return end;
                    }
                }
                Err(err) => {
                    debug!(task_id = %task_id, error = %err, "dropping malformed progress frame");
                }
            },
            Some(Ok(Message::Close(close))) => {
                let code = close.map(|frame| u16::from(frame.code));
                let kind = code.map_or(CloseKind::Abnormal, CloseKind::classify);
                match kind {
                    CloseKind::Normal => {
                        debug!(task_id = %task_id, "progress channel closed");
                        return SessionEnd::Finished;
                    }
                    CloseKind::Unauthorized | CloseKind::Forbidden => {
                        warn!(task_id = %task_id, ?code, "progress channel rejected");
                        if let Some(message) = kind.terminal_message() {
                            sink.on_error(message.to_owned()).await;
                        }
                        return SessionEnd::Finished;
                    }
                    CloseKind::Abnormal => {
                        warn!(task_id = %task_id, ?code, "progress channel closed abnormally");
                        return SessionEnd::Abnormal;
                    }
                }
            }
            // Ping/pong and binary frames carry no progress data.
            Some(Ok(_)) => {}
        }
    }
}

/// Dispatch one decoded message. Returns `Some` when the session must end.
async fn dispatch(
    message: ServerMessage,
    ws: &mut WsStream,
    task_id: &TaskId,
    sink: &dyn ProgressSink,
) -> Option<SessionEnd> {
    match message {
        ServerMessage::Completed { resume_id } => {
            info!(task_id = %task_id, resume_id = %resume_id, "parsing completed");
            sink.on_completed(resume_id).await;
            let _ = ws.close(Some(normal_close())).await;
            Some(SessionEnd::Finished)
        }
        ServerMessage::Error { message } => {
            let message = message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned());
            warn!(task_id = %task_id, message = %message, "server reported a parsing error");
            sink.on_error(message).await;
            let _ = ws.close(Some(normal_close())).await;
            Some(SessionEnd::Finished)
        }
        ServerMessage::Unknown => {
            debug!(task_id = %task_id, "ignoring unrecognized message type");
            None
        }
        informational => {
            if let Some(update) = informational.into_update() {
                sink.on_progress(update).await;
            }
            None
        }
    }
}

/// Sleep out the backoff delay, or report exhaustion.
///
/// Returns `true` when the caller should attempt another connection. The
/// sleep races the cancellation token, so `disconnect()` aborts a pending
/// reconnect instead of letting it fire later.
async fn wait_for_retry(
    policy: &ReconnectPolicy,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
    attempts: &mut u32,
) -> bool {
    if *attempts >= policy.max_attempts {
        warn!(max_attempts = policy.max_attempts, "reconnect budget exhausted");
        sink.on_error(format!(
            "Failed to reconnect after {} attempts",
            policy.max_attempts
        ))
        .await;
        return false;
    }

    *attempts += 1;
    debug!(
        attempt = *attempts,
        delay_ms = policy.delay_ms,
        "reconnecting after abnormal closure"
    );
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(policy.delay()) => true,
    }
}

fn normal_close() -> CloseFrame {
    CloseFrame {
        code: CloseCode::Normal,
        reason: "".into(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
