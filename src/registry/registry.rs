//! Registry: routine slots, runner startup, ordered shutdown.
//!
//! The registry is the lifecycle component in front of the task table. It
//! accepts routines ([`Registry::register`]), spawns one [`TaskRunner`] per
//! registered task ([`Registry::start_all`]), and drives the shutdown
//! sequence ([`Registry::stop_all`]).
//!
//! ## Shutdown ordering (mandatory)
//! ```text
//! lock shared ──► system_running := false, every entry inactive ──► unlock
//!        │
//!        ▼
//! wake_all()            (release every runner parked on the wake signal)
//!        │
//!        ▼
//! token.cancel()        (abort cancellable idles)
//!        │
//!        ▼
//! join every runner     (bounded by Config::grace)
//! ```
//! Mark-inactive must happen before the broadcast and the broadcast before
//! the join, or a parked runner re-checks a still-true liveness condition
//! and stalls shutdown.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::core::TaskRunner;
use crate::error::{RegistryError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::registry::table::TaskId;
use crate::routines::{RunContext, Routine};
use crate::state::StateStore;

/// Registers routines and owns their runners.
pub struct Registry {
    store: Arc<StateStore>,
    bus: Bus,
    token: CancellationToken,
    grace: Duration,
    routines: StdMutex<Vec<Arc<dyn Routine>>>,
    runners: Mutex<JoinSet<TaskId>>,
    spawned: StdMutex<Vec<TaskId>>,
}

impl Registry {
    /// Creates a registry bound to the store, bus, and runtime token.
    pub fn new(
        store: Arc<StateStore>,
        bus: Bus,
        token: CancellationToken,
        grace: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            bus,
            token,
            grace,
            routines: StdMutex::new(Vec::new()),
            runners: Mutex::new(JoinSet::new()),
            spawned: StdMutex::new(Vec::new()),
        })
    }

    /// Adds a routine to the task table.
    ///
    /// Fails with [`RegistryError::CapacityExceeded`] when the table is
    /// full; the failure is logged, the specific registration is aborted,
    /// and previously registered tasks are unaffected.
    pub fn register(&self, routine: Arc<dyn Routine>) -> Result<TaskId, RegistryError> {
        let name = routine.name().to_string();
        let priority = routine.priority();

        let id = {
            let mut shared = self.store.shared();
            match shared.tasks.register(&name, priority) {
                Ok(id) => id,
                Err(err) => {
                    warn!(task = %name, label = err.as_label(), "registration rejected");
                    return Err(err);
                }
            }
        };
        self.routines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(routine);

        info!(task = %name, priority, id, "task registered");
        self.bus.publish(
            Event::now(EventKind::TaskRegistered)
                .with_task(name)
                .with_priority(priority),
        );
        Ok(id)
    }

    /// Spawns one runner per registered routine.
    ///
    /// A per-task spawn failure marks that task inactive and is logged;
    /// startup continues for the remaining tasks.
    pub async fn start_all(&self) {
        let routines: Vec<(TaskId, Arc<dyn Routine>)> = self
            .routines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .enumerate()
            .collect();

        let mut runners = self.runners.lock().await;
        for (id, routine) in routines {
            let name = routine.name().to_string();
            match self.spawn_runner(&mut runners, id, routine) {
                Ok(()) => info!(task = %name, id, "runner spawned"),
                Err(err) => {
                    error!(task = %name, id, label = err.as_label(), "spawn failed; task deactivated");
                    self.store.shared().tasks.deactivate(id);
                    self.bus
                        .publish(Event::now(EventKind::TaskSpawnFailed).with_task(name));
                }
            }
        }
    }

    /// Spawns the runner for one task, refusing ids whose table entry is
    /// missing or already inactive.
    fn spawn_runner(
        &self,
        runners: &mut JoinSet<TaskId>,
        id: TaskId,
        routine: Arc<dyn Routine>,
    ) -> Result<(), RegistryError> {
        if !self.store.shared().tasks.is_active(id) {
            return Err(RegistryError::SpawnFailed {
                name: routine.name().to_string(),
            });
        }
        let ctx = RunContext {
            store: self.store.clone(),
            bus: self.bus.clone(),
        };
        let runner = TaskRunner::new(id, routine, ctx);
        runners.spawn(runner.run(self.token.child_token()));
        self.spawned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id);
        Ok(())
    }

    /// Stops every runner: mark inactive, broadcast, cancel, join.
    ///
    /// Returns [`RuntimeError::GraceExceeded`] with the names of unjoined
    /// tasks when the join outlives the grace period.
    pub async fn stop_all(&self) -> Result<(), RuntimeError> {
        info!("stopping all tasks");
        {
            let mut shared = self.store.shared();
            shared.system_running = false;
            shared.tasks.mark_all_inactive();
        }
        self.store.wake_all();
        self.token.cancel();

        let mut runners = self.runners.lock().await;
        let mut joined: Vec<TaskId> = Vec::new();
        let drained = tokio::time::timeout(self.grace, async {
            while let Some(res) = runners.join_next().await {
                match res {
                    Ok(id) => joined.push(id),
                    Err(err) => warn!(%err, "runner panicked during shutdown"),
                }
            }
        })
        .await;

        match drained {
            Ok(()) => {
                info!(joined = joined.len(), "all runners joined");
                self.bus.publish(Event::now(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_elapsed) => {
                let stuck = self.stuck_names(&joined);
                error!(?stuck, grace = ?self.grace, "shutdown grace exceeded");
                self.bus.publish(Event::now(EventKind::GraceExceeded));
                Err(RuntimeError::GraceExceeded {
                    grace: self.grace,
                    stuck,
                })
            }
        }
    }

    /// Names of spawned tasks whose runners have not joined.
    fn stuck_names(&self, joined: &[TaskId]) -> Vec<String> {
        let spawned = self
            .spawned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let shared = self.store.shared();
        spawned
            .into_iter()
            .filter(|id| !joined.contains(id))
            .filter_map(|id| shared.tasks.name_of(id))
            .map(|name| name.to_string())
            .collect()
    }
}
