//! Runtime events emitted by handlers, registry, and runners.
//!
//! [`EventKind`] classifies events across four categories:
//! - **Alarm events**: externally triggered safety conditions (fire,
//!   passenger emergency, chain pull, low power)
//! - **Cabin events**: cabin-scoped control operations (light, temperature)
//! - **Presentation events**: textual status reports for the panel
//! - **Lifecycle events**: task registration, runner exits, shutdown
//!
//! The [`Event`] struct carries optional metadata (task name, cabin index,
//! human-readable detail) attached with builder-style `with_*` methods.
//!
//! ## Ordering
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically; use it to restore order when events are logged out of band.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::state::CabinId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Alarm events ===
    /// Fire alert raised for a cabin. Sets `cabin`, `detail`.
    FireAlert,
    /// Passenger emergency raised for a cabin. Sets `cabin`, `detail`.
    PassengerEmergency,
    /// Chain pulled (emergency stop). Sets `detail`.
    ChainPull,
    /// Low-power condition reported. Sets `detail`.
    PowerLow,

    // === Cabin events ===
    /// Cabin light switched. Sets `cabin`, `detail` ("ON"/"OFF").
    LightChanged,
    /// Cabin temperature target changed. Sets `cabin`, `detail`.
    TempAdjusted,

    // === Presentation events ===
    /// Full textual dump of the task table and cabin table. Sets `detail`.
    StatusReport,

    // === Lifecycle events ===
    /// Task accepted into the table. Sets `task`, `priority`.
    TaskRegistered,
    /// Runner could not be started; task marked inactive. Sets `task`.
    TaskSpawnFailed,
    /// Runner loop exited. Sets `task`.
    TaskExited,
    /// Shutdown sequence initiated.
    ShutdownRequested,
    /// Every runner exited within the grace period.
    AllStoppedWithin,
    /// Grace period elapsed with runners still live.
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Cabin index, if the event is cabin-scoped.
    pub cabin: Option<CabinId>,
    /// Advisory priority attached to registrations and preemption requests.
    pub priority: Option<u8>,
    /// Human-readable detail for the presentation collaborator.
    pub detail: Option<Arc<str>>,
}

impl Event {
    /// Creates an event of the given kind stamped with the current time and
    /// the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            cabin: None,
            priority: None,
            detail: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a cabin index.
    #[inline]
    pub fn with_cabin(mut self, cabin: CabinId) -> Self {
        self.cabin = Some(cabin);
        self
    }

    /// Attaches an advisory priority.
    #[inline]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Attaches a human-readable detail string.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::ChainPull);
        let b = Event::now(EventKind::ChainPull);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::now(EventKind::FireAlert)
            .with_cabin(3)
            .with_detail("FIRE EMERGENCY!")
            .with_priority(10);
        assert_eq!(ev.kind, EventKind::FireAlert);
        assert_eq!(ev.cabin, Some(3));
        assert_eq!(ev.priority, Some(10));
        assert_eq!(ev.detail.as_deref(), Some("FIRE EMERGENCY!"));
        assert!(ev.task.is_none());
    }
}
