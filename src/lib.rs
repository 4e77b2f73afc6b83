//! # coachvisor
//!
//! **coachvisor** is a cooperative supervision runtime for multi-cabin
//! railway coach control: a fixed set of prioritized, recurring tasks reads
//! and mutates shared safety/comfort state (per-cabin lighting, temperature,
//! emergency and fire flags) under a strict locking discipline.
//!
//! ## Architecture
//! ```text
//!  commands (one per line)          OS signals
//!          │                            │
//!          ▼                            ▼
//!   ┌─────────────┐             ┌──────────────┐
//!   │  listener   │──dispatch──►│  Supervisor  │
//!   └─────────────┘      │      └──────┬───────┘
//!                        ▼             │ register / start_all / stop_all
//!                  ┌──────────┐        ▼
//!                  │ Controls │  ┌───────────┐
//!                  │ (handlers│  │ Registry  │───spawns───┐
//!                  │  mutate, │  └───────────┘            ▼
//!                  │  wake)   │        │        TaskRunner × ≤8
//!                  └────┬─────┘        │        (event-driven / periodic)
//!                       │              │                  │
//!                       ▼              ▼                  ▼
//!               ┌─────────────────────────────────────────────┐
//!               │                 StateStore                  │
//!               │  global lock: sticky flags + task table     │
//!               │  one lock per cabin  ·  broadcast wake      │
//!               └─────────────────────────────────────────────┘
//!                       │ publish Event
//!                       ▼
//!                      Bus ──► subscriber listener ──► LogWriter
//!                                                      StatusPanel
//! ```
//!
//! ## Model
//! - **Advisory priority**: every registered task runs as its own tokio
//!   task; the priority field and [`TaskTable::highest_priority_ready`] are
//!   recorded and queryable but consulted by no dispatch path. `preempt`
//!   only logs and broadcasts the wake signal.
//! - **Sticky alarms**: `fire_active`, `emergency_active`, and `power_low`
//!   are set by event handlers and never cleared automatically; `Emergency`
//!   and `Fire` cabin states are terminal.
//! - **Cooperative cancellation**: shutdown marks every task inactive,
//!   broadcasts the wake signal, cancels the runtime token, then joins all
//!   runners within a grace bound. There is no mid-action cancellation.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use coachvisor::{Config, LogWriter, StatusPanel, Subscribe, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter), Arc::new(StatusPanel)];
//!     let supervisor = Supervisor::new(Config::default(), subs);
//!     supervisor.register_defaults()?;
//!
//!     // Wire the line-oriented command listener to stdin.
//!     let controls = supervisor.controls();
//!     let token = supervisor.cancellation_token();
//!     tokio::spawn(coachvisor::listen(
//!         tokio::io::BufReader::new(tokio::io::stdin()),
//!         controls,
//!         token,
//!     ));
//!
//!     // Runs until SIGINT/SIGTERM, then joins every runner.
//!     supervisor.run().await?;
//!     Ok(())
//! }
//! ```

mod command;
mod config;
mod control;
mod core;
mod error;
mod events;
mod listener;
mod registry;
mod render;
mod routines;
mod state;
mod subscribers;

// ---- Public re-exports ----

pub use command::{Command, parse};
pub use config::Config;
pub use control::Controls;
pub use self::core::{Supervisor, wait_for_shutdown_signal};
pub use error::{RegistryError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use listener::listen;
pub use registry::{Registry, TaskEntry, TaskId, TaskState, TaskTable};
pub use render::status_dump;
pub use routines::{
    ChainWatch, DisplayRefresh, EmergencyWatch, FireWatch, LightingSweep, LogTicker, PowerManager,
    RunContext, Routine, TempRegulator,
};
pub use routines::{
    PRIORITY_CHAIN, PRIORITY_DISPLAY, PRIORITY_EMERGENCY, PRIORITY_FIRE, PRIORITY_LIGHTING,
    PRIORITY_LOGGING, PRIORITY_POWER, PRIORITY_TEMP,
};
pub use state::{
    AlarmFlag, Cabin, CabinId, CabinSnapshot, CabinState, Shared, StateStore, SystemSnapshot,
    TaskSnapshot,
};
pub use subscribers::{LogWriter, StatusPanel, Subscribe};
