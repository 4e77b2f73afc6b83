//! The closed set of recurring coach-control routines.
//!
//! A [`Routine`] is the unit of work a task runner drives: a name, an
//! advisory priority, an optional watched alarm flag, and one bounded
//! [`service`](Routine::service) action. The dispatch table of the original
//! controller is replaced by this capability interface, implemented once per
//! task kind and selected at registration time.
//!
//! ## Two shapes
//! - **Event-driven** (`watch()` returns `Some(flag)`): serviced only while
//!   the watched sticky flag is set; otherwise the runner blocks on the wake
//!   signal.
//! - **Periodic** (`watch()` returns `None`): serviced on a fixed cadence.
//!
//! `service` returns the idle interval before the next cycle, which lets the
//! power manager pick a different cadence per branch.
//!
//! ## Standard set
//! | routine | priority | shape | idle |
//! |---|---|---|---|
//! | fire-watch | 10 | watch `Fire` | 1s |
//! | emergency-watch | 9 | watch `Emergency` | 1s |
//! | chain-watch | 8 | periodic | 2s |
//! | power-manager | 7 | periodic | 2s low / 3s normal |
//! | temp-regulator | 4 | periodic | 5s |
//! | lighting-sweep | 3 | periodic | 3s |
//! | display-refresh | 2 | periodic | 2s |
//! | log-ticker | 1 | periodic | 10s |

mod alarms;
mod duty;
mod panel;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::events::Bus;
use crate::state::{AlarmFlag, StateStore};

pub use alarms::{EmergencyWatch, FireWatch};
pub use duty::{ChainWatch, LightingSweep, PowerManager, TempRegulator};
pub use panel::{DisplayRefresh, LogTicker};

/// Advisory priority of the fire-watch routine.
pub const PRIORITY_FIRE: u8 = 10;
/// Advisory priority of the emergency-watch routine.
pub const PRIORITY_EMERGENCY: u8 = 9;
/// Advisory priority of the chain-watch routine.
pub const PRIORITY_CHAIN: u8 = 8;
/// Advisory priority of the power-manager routine.
pub const PRIORITY_POWER: u8 = 7;
/// Advisory priority of the temp-regulator routine.
pub const PRIORITY_TEMP: u8 = 4;
/// Advisory priority of the lighting-sweep routine.
pub const PRIORITY_LIGHTING: u8 = 3;
/// Advisory priority of the display-refresh routine.
pub const PRIORITY_DISPLAY: u8 = 2;
/// Advisory priority of the log-ticker routine.
pub const PRIORITY_LOGGING: u8 = 1;

/// Shared context handed to every routine service call.
#[derive(Clone)]
pub struct RunContext {
    /// The shared state store.
    pub store: Arc<StateStore>,
    /// The runtime event bus.
    pub bus: Bus,
}

/// A named, prioritized, recurring unit of coach-control work.
///
/// Implementations must keep `service` bounded: no waiting on the wake
/// signal, no unbounded loops. The runner owns the loop, the blocking, and
/// the task-table bookkeeping.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use coachvisor::{AlarmFlag, Routine, RunContext};
///
/// struct DoorWatch;
///
/// #[async_trait]
/// impl Routine for DoorWatch {
///     fn name(&self) -> &str { "door-watch" }
///     fn priority(&self) -> u8 { 5 }
///     fn watch(&self) -> Option<AlarmFlag> { None }
///     async fn service(&self, _ctx: &RunContext) -> Duration {
///         // inspect doors...
///         Duration::from_secs(2)
///     }
/// }
/// ```
#[async_trait]
pub trait Routine: Send + Sync + 'static {
    /// Stable, human-readable routine name.
    fn name(&self) -> &str;

    /// Advisory priority (higher = more urgent). Recorded in the task
    /// table, consulted by nothing in the dispatch path.
    fn priority(&self) -> u8;

    /// The sticky flag this routine waits on, or `None` for a periodic
    /// routine.
    fn watch(&self) -> Option<AlarmFlag>;

    /// Performs one bounded service action and returns the idle interval
    /// before the next cycle.
    async fn service(&self, ctx: &RunContext) -> Duration;
}
