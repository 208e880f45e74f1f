//! # parsetrack-client
//!
//! Progress subscription client for resume-parsing tasks.
//!
//! [`ProgressSubscriber`] turns a task identifier into a stream of typed
//! progress events, hiding the transport and reconnection mechanics from
//! callers:
//!
//! - opens one WebSocket channel per task, with the URL derived from the
//!   configured base API address
//! - decodes the tagged-message protocol and forwards typed events to a
//!   caller-supplied [`ProgressSink`]
//! - reconnects a bounded number of times after abnormal closures, with a
//!   fixed delay and a cancellable timer
//!
//! Subscribers are instantiable: one instance owns at most one live channel,
//! and concurrent tasks each get their own instance.

#![deny(unsafe_code)]

pub mod endpoint;
pub mod session;
pub mod sink;
pub mod subscriber;

pub use session::CONNECTION_ERROR_MESSAGE;
pub use sink::{CallbackSink, ChannelSink, ProgressEvent, ProgressSink};
pub use subscriber::{ClientConfig, ProgressSubscriber};
