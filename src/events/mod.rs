//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the event handlers, the
//! registry, and the task runners.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Controls` (command handlers), `Registry`, `TaskRunner`,
//!   `Supervisor` (shutdown milestones).
//! - **Consumer**: `Supervisor::subscriber_listener()`, which forwards every
//!   event to the configured [`Subscribe`](crate::Subscribe) implementations
//!   (presentation panel, log writer).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
