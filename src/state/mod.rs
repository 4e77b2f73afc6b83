//! Shared safety/comfort state for the coach.
//!
//! The state store is the leaf component of the runtime: everything else
//! (registry, runners, event handlers, presentation) reads and mutates state
//! through it.
//!
//! ## Contents
//! - [`Cabin`], [`CabinState`] — per-cabin record and its state machine
//! - [`StateStore`], [`Shared`], [`AlarmFlag`] — the shared store: one global
//!   lock over flags + task table, one lock per cabin, and the broadcast
//!   wake signal
//! - [`SystemSnapshot`] and row types — read-only view for presentation
//!
//! ## Locking discipline
//! The global lock and a cabin lock are **never** held simultaneously by the
//! same call path. Waiting on the wake signal arms the waiter while the
//! global lock is still held, so a broadcast between release and sleep
//! cannot be missed.

mod cabin;
mod snapshot;
mod store;

pub use cabin::{Cabin, CabinId, CabinState};
pub use snapshot::{CabinSnapshot, SystemSnapshot, TaskSnapshot};
pub use store::{AlarmFlag, Shared, StateStore};
