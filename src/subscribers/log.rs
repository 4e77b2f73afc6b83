//! Structured log sink for runtime events.

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Logs every runtime event through `tracing`.
///
/// Alarm-class events log at `warn`/`error`; lifecycle and cabin events at
/// `info`. Status reports are skipped here; the panel owns those.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::FireAlert => {
                error!(seq = ev.seq, cabin = ?ev.cabin, "event: fire alert");
            }
            EventKind::PassengerEmergency => {
                warn!(seq = ev.seq, cabin = ?ev.cabin, "event: passenger emergency");
            }
            EventKind::ChainPull => {
                warn!(seq = ev.seq, "event: chain pulled");
            }
            EventKind::PowerLow => {
                warn!(seq = ev.seq, "event: low power");
            }
            EventKind::LightChanged => {
                info!(seq = ev.seq, cabin = ?ev.cabin, detail = ?ev.detail, "event: light changed");
            }
            EventKind::TempAdjusted => {
                info!(seq = ev.seq, cabin = ?ev.cabin, detail = ?ev.detail, "event: temperature adjusted");
            }
            EventKind::TaskRegistered => {
                info!(seq = ev.seq, task = ?ev.task, priority = ?ev.priority, "event: task registered");
            }
            EventKind::TaskSpawnFailed => {
                error!(seq = ev.seq, task = ?ev.task, "event: task spawn failed");
            }
            EventKind::TaskExited => {
                info!(seq = ev.seq, task = ?ev.task, "event: task exited");
            }
            EventKind::ShutdownRequested => {
                info!(seq = ev.seq, "event: shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                info!(seq = ev.seq, "event: all runners stopped within grace");
            }
            EventKind::GraceExceeded => {
                error!(seq = ev.seq, "event: shutdown grace exceeded");
            }
            EventKind::StatusReport => {}
        }
    }
}
