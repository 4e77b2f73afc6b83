//! Presentation-side periodic routines: display refresh and log ticker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::events::{Event, EventKind};
use crate::render;
use crate::routines::{PRIORITY_DISPLAY, PRIORITY_LOGGING, RunContext, Routine};
use crate::state::AlarmFlag;

const DISPLAY_INTERVAL: Duration = Duration::from_secs(2);
const LOGGING_INTERVAL: Duration = Duration::from_secs(10);

/// Ticks that pass between full panel dumps.
const FULL_DUMP_EVERY: u64 = 10;

/// Publishes the status panel on a fixed cadence.
///
/// Most ticks are silent; every tenth tick emits the full task/cabin dump
/// as a [`EventKind::StatusReport`], so the terminal is not flooded while
/// the panel still refreshes periodically.
pub struct DisplayRefresh {
    ticks: AtomicU64,
}

impl DisplayRefresh {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
        }
    }
}

impl Default for DisplayRefresh {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Routine for DisplayRefresh {
    fn name(&self) -> &str {
        "display-refresh"
    }

    fn priority(&self) -> u8 {
        PRIORITY_DISPLAY
    }

    fn watch(&self) -> Option<AlarmFlag> {
        None
    }

    async fn service(&self, ctx: &RunContext) -> Duration {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if tick % FULL_DUMP_EVERY == 0 {
            let dump = render::status_dump(&ctx.store.snapshot());
            ctx.bus
                .publish(Event::now(EventKind::StatusReport).with_detail(dump));
        }
        DISPLAY_INTERVAL
    }
}

/// Logs a one-line task-table summary every ten seconds.
pub struct LogTicker;

#[async_trait]
impl Routine for LogTicker {
    fn name(&self) -> &str {
        "log-ticker"
    }

    fn priority(&self) -> u8 {
        PRIORITY_LOGGING
    }

    fn watch(&self) -> Option<AlarmFlag> {
        None
    }

    async fn service(&self, ctx: &RunContext) -> Duration {
        let snap = ctx.store.snapshot();
        let total: u64 = snap.tasks.iter().map(|t| t.execution_count).sum();
        info!(
            tasks = snap.tasks.len(),
            cycles = total,
            power_low = snap.power_low,
            emergency = snap.emergency_active,
            fire = snap.fire_active,
            "periodic system log"
        );
        LOGGING_INTERVAL
    }
}
