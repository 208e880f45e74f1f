//! # parsetrack-core
//!
//! Foundation types for the parsetrack progress client.
//!
//! This crate provides the shared vocabulary the client and CLI depend on:
//!
//! - **Branded IDs**: [`TaskId`] and [`ResumeId`] as newtypes for type safety
//! - **Wire protocol**: [`ServerMessage`] inbound envelope and the
//!   [`ProgressUpdate`] payload delivered to subscribers
//! - **Close codes**: [`CloseKind`] taxonomy for WebSocket close frames
//! - **Reconnect policy**: [`ReconnectPolicy`] parameters for abnormal closures
//! - **Errors**: [`ClientError`] via `thiserror`

#![deny(unsafe_code)]

pub mod close;
pub mod errors;
pub mod ids;
pub mod protocol;
pub mod reconnect;

pub use close::CloseKind;
pub use errors::ClientError;
pub use ids::{ResumeId, TaskId};
pub use protocol::{ProgressUpdate, ServerMessage};
pub use reconnect::ReconnectPolicy;
