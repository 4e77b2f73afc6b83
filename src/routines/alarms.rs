//! Event-driven alarm watchers: fire and passenger emergency.
//!
//! Both watchers block on the wake signal until their sticky flag is raised,
//! then service once per second for as long as the flag stays set. The
//! flags are sticky, so a watcher that was mid-service when the broadcast
//! fired still observes the condition on its next check.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::routines::{PRIORITY_EMERGENCY, PRIORITY_FIRE, RunContext, Routine};
use crate::state::{AlarmFlag, CabinState};

/// Idle interval between alarm service cycles while the flag is set.
const ALARM_HOLD: Duration = Duration::from_secs(1);

/// Highest-priority watcher: services the fire alert.
pub struct FireWatch;

#[async_trait]
impl Routine for FireWatch {
    fn name(&self) -> &str {
        "fire-watch"
    }

    fn priority(&self) -> u8 {
        PRIORITY_FIRE
    }

    fn watch(&self) -> Option<AlarmFlag> {
        Some(AlarmFlag::Fire)
    }

    async fn service(&self, ctx: &RunContext) -> Duration {
        let burning: Vec<usize> = ctx
            .store
            .snapshot()
            .cabins
            .iter()
            .filter(|c| c.state == CabinState::Fire)
            .map(|c| c.id)
            .collect();
        warn!(cabins = ?burning, "servicing fire emergency");
        ALARM_HOLD
    }
}

/// Watcher for the passenger-emergency flag (also raised by a chain pull).
pub struct EmergencyWatch;

#[async_trait]
impl Routine for EmergencyWatch {
    fn name(&self) -> &str {
        "emergency-watch"
    }

    fn priority(&self) -> u8 {
        PRIORITY_EMERGENCY
    }

    fn watch(&self) -> Option<AlarmFlag> {
        Some(AlarmFlag::Emergency)
    }

    async fn service(&self, ctx: &RunContext) -> Duration {
        let affected: Vec<usize> = ctx
            .store
            .snapshot()
            .cabins
            .iter()
            .filter(|c| c.state == CabinState::Emergency)
            .map(|c| c.id)
            .collect();
        warn!(cabins = ?affected, "handling passenger emergency");
        ALARM_HOLD
    }
}
