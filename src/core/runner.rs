//! TaskRunner: one cooperative execution loop per registered task.
//!
//! The runner owns everything the routine itself must not do: the loop, the
//! task-table bookkeeping (Ready/Running transitions, completion counts),
//! blocking on the wake signal, and cancellable idling.
//!
//! ## Loop shapes
//! ```text
//! event-driven (watch = Some(flag)):        periodic (watch = None):
//!
//! loop {                                    loop {
//!   lock shared                               lock shared
//!   live? ── no ─► exit                       live? ── no ─► exit
//!   flag set?                                 state := Running, unlock
//!     yes: state := Running, unlock           service()          (bounded)
//!          service()        (bounded)         record_completion
//!          record_completion                  lock, state := Ready, unlock
//!          idle(hold)     (cancellable)       idle(interval)  (cancellable)
//!     no:  state := Ready                   }
//!          arm wake waiter, unlock
//!          await wake | cancel
//!          loop            (re-check)
//! }
//! ```
//!
//! ## Rules
//! - Liveness (`system_running && active`) is checked under the global lock
//!   at the top of every cycle; nothing cancels a service mid-action.
//! - The wake waiter is armed **before** the global lock is released, so a
//!   broadcast issued right after the flag check cannot be missed; waking
//!   re-enters the loop and re-checks the flag (spurious wakes are safe).
//! - Idle sleeps race the cancellation token, so shutdown does not wait out
//!   the longest interval.

use tokio::time;
use tokio_util::sync::CancellationToken;

use std::sync::Arc;
use std::time::Duration;

use crate::events::{Event, EventKind};
use crate::registry::{TaskId, TaskState};
use crate::routines::{RunContext, Routine};
use crate::state::AlarmFlag;

/// Drives a single [`Routine`] until shutdown.
pub struct TaskRunner {
    id: TaskId,
    routine: Arc<dyn Routine>,
    ctx: RunContext,
}

impl TaskRunner {
    pub fn new(id: TaskId, routine: Arc<dyn Routine>, ctx: RunContext) -> Self {
        Self { id, routine, ctx }
    }

    /// Runs the loop shape matching the routine. Returns the task id so the
    /// registry can account for joined runners.
    pub async fn run(self, token: CancellationToken) -> TaskId {
        tracing::info!(task = self.routine.name(), id = self.id, "runner started");
        match self.routine.watch() {
            Some(flag) => self.run_event_driven(flag, &token).await,
            None => self.run_periodic(&token).await,
        }
        tracing::info!(task = self.routine.name(), id = self.id, "runner stopped");
        self.ctx.bus.publish(
            Event::now(EventKind::TaskExited).with_task(self.routine.name()),
        );
        self.id
    }

    async fn run_event_driven(&self, flag: AlarmFlag, token: &CancellationToken) {
        loop {
            if token.is_cancelled() {
                break;
            }
            let notified = self.ctx.store.wake_signal().notified();
            tokio::pin!(notified);

            // Flag check and waiter arming happen under the global lock, so
            // release-and-wait is atomic with respect to broadcasts.
            let parked = {
                let mut shared = self.ctx.store.shared();
                if !shared.system_running || !shared.tasks.is_active(self.id) {
                    break;
                }
                if shared.alarm(flag) {
                    shared.tasks.set_state(self.id, TaskState::Running);
                    false
                } else {
                    shared.tasks.set_state(self.id, TaskState::Ready);
                    notified.as_mut().enable();
                    true
                }
            };

            if parked {
                tokio::select! {
                    _ = notified.as_mut() => {}
                    _ = token.cancelled() => break,
                }
                continue;
            }

            let hold = self.routine.service(&self.ctx).await;
            self.ctx.store.record_completion(self.id);
            if !idle(hold, token).await {
                break;
            }
        }
    }

    async fn run_periodic(&self, token: &CancellationToken) {
        loop {
            if token.is_cancelled() {
                break;
            }
            {
                let mut shared = self.ctx.store.shared();
                if !shared.system_running || !shared.tasks.is_active(self.id) {
                    break;
                }
                shared.tasks.set_state(self.id, TaskState::Running);
            }

            let interval = self.routine.service(&self.ctx).await;
            self.ctx.store.record_completion(self.id);
            {
                let mut shared = self.ctx.store.shared();
                shared.tasks.set_state(self.id, TaskState::Ready);
            }

            if !idle(interval, token).await {
                break;
            }
        }
    }
}

/// Sleeps for `period`, racing the cancellation token.
///
/// Returns `false` when the token fired first.
async fn idle(period: Duration, token: &CancellationToken) -> bool {
    let sleep = time::sleep(period);
    tokio::pin!(sleep);
    tokio::select! {
        _ = &mut sleep => true,
        _ = token.cancelled() => false,
    }
}
