//! Shared state store: global lock, per-cabin locks, wake signal.
//!
//! [`StateStore`] is the single ownership unit for everything the runtime
//! shares: the system-wide record ([`Shared`]: sticky alarm flags, the
//! running flag, the embedded task table) behind one mutex, one mutex per
//! cabin, and the [`Notify`] used as the broadcast wake signal.
//!
//! ## Wake protocol
//! ```text
//! waiter (runner):                        broadcaster (handler/shutdown):
//!   lock shared                             mutate shared, unlock
//!   condition met? ── yes ─► service        wake_all()  (notify_waiters)
//!        │ no
//!   arm notified() while locked
//!   unlock, await
//!   woken ─► loop (re-check condition)
//! ```
//! Arming while the lock is held makes release-and-wait atomic with respect
//! to broadcasts: a `wake_all()` issued after the waiter observed a false
//! condition is guaranteed to release it. Waiters always re-check their
//! condition after waking, which also absorbs spurious wakes.
//!
//! ## Lock discipline
//! No call path holds the global lock and a cabin lock at the same time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::config::Config;
use crate::registry::{TaskId, TaskTable};
use crate::state::cabin::{Cabin, CabinId};
use crate::state::snapshot::{CabinSnapshot, SystemSnapshot};

/// Names one of the three sticky alarm flags.
///
/// Sticky: set by an event handler, never cleared automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmFlag {
    Fire,
    Emergency,
    PowerLow,
}

/// The system-wide record protected by the global lock.
pub struct Shared {
    /// Cleared exactly once, during shutdown. Never reset.
    pub system_running: bool,
    /// Sticky: low-power condition reported.
    pub power_low: bool,
    /// Sticky: passenger emergency or chain pull reported.
    pub emergency_active: bool,
    /// Sticky: fire alert reported.
    pub fire_active: bool,
    /// Task descriptor table, embedded under the same lock.
    pub tasks: TaskTable,
}

impl Shared {
    /// Reads one sticky alarm flag.
    pub fn alarm(&self, flag: AlarmFlag) -> bool {
        match flag {
            AlarmFlag::Fire => self.fire_active,
            AlarmFlag::Emergency => self.emergency_active,
            AlarmFlag::PowerLow => self.power_low,
        }
    }

    /// Sets one sticky alarm flag.
    pub fn raise(&mut self, flag: AlarmFlag) {
        match flag {
            AlarmFlag::Fire => self.fire_active = true,
            AlarmFlag::Emergency => self.emergency_active = true,
            AlarmFlag::PowerLow => self.power_low = true,
        }
    }
}

/// Shared handle over all mutable runtime state.
///
/// Created once at startup, shared via `Arc`, torn down with the process.
/// Cabins are created here and never added or removed afterwards.
pub struct StateStore {
    shared: Mutex<Shared>,
    cabins: Vec<Mutex<Cabin>>,
    wake: Notify,
}

impl StateStore {
    /// Builds the store: `cfg.cabin_count` cabins at the default
    /// temperature, an empty task table, all flags clear, system running.
    pub fn new(cfg: &Config) -> Arc<Self> {
        let cabins = (0..cfg.cabin_count)
            .map(|id| Mutex::new(Cabin::new(id, cfg.default_temperature)))
            .collect();
        Arc::new(Self {
            shared: Mutex::new(Shared {
                system_running: true,
                power_low: false,
                emergency_active: false,
                fire_active: false,
                tasks: TaskTable::new(cfg.task_capacity),
            }),
            cabins,
            wake: Notify::new(),
        })
    }

    /// Acquires the global lock.
    ///
    /// Poisoning is absorbed: a panicked holder cannot leave the record in a
    /// torn state (every mutation is a plain field write), so the inner
    /// value is recovered and the system keeps running.
    pub fn shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of cabins. Fixed for the process lifetime.
    pub fn cabin_count(&self) -> usize {
        self.cabins.len()
    }

    /// All cabin cells, for iteration without holding the global lock.
    pub fn cabins(&self) -> &[Mutex<Cabin>] {
        &self.cabins
    }

    /// Runs `f` under the lock of cabin `id`.
    ///
    /// Returns `None` for an out-of-range index (silently absorbed, per the
    /// command protocol).
    pub fn with_cabin<R>(&self, id: CabinId, f: impl FnOnce(&mut Cabin) -> R) -> Option<R> {
        let cell = self.cabins.get(id)?;
        let mut cabin = cell.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut cabin))
    }

    /// The wake signal, for waiters that need to arm interest under the
    /// global lock before releasing it.
    pub fn wake_signal(&self) -> &Notify {
        &self.wake
    }

    /// Broadcasts the wake signal: releases every currently-armed waiter.
    pub fn wake_all(&self) {
        self.wake.notify_waiters();
    }

    /// Reads `system_running` under the global lock.
    pub fn is_running(&self) -> bool {
        self.shared().system_running
    }

    /// Records a completed service cycle for `id` under the global lock.
    /// Out-of-range ids are ignored.
    pub fn record_completion(&self, id: TaskId) {
        self.shared().tasks.record_completion(id);
    }

    /// Takes a read-only snapshot for presentation.
    ///
    /// The global lock is taken and released before any cabin lock.
    pub fn snapshot(&self) -> SystemSnapshot {
        let (system_running, power_low, emergency_active, fire_active, tasks) = {
            let shared = self.shared();
            (
                shared.system_running,
                shared.power_low,
                shared.emergency_active,
                shared.fire_active,
                shared.tasks.snapshot(),
            )
        };
        let cabins = self
            .cabins
            .iter()
            .map(|cell| {
                let cabin = cell.lock().unwrap_or_else(PoisonError::into_inner);
                CabinSnapshot {
                    id: cabin.id(),
                    light_on: cabin.light_on(),
                    temperature: cabin.temperature(),
                    state: cabin.state(),
                }
            })
            .collect();
        SystemSnapshot {
            system_running,
            power_low,
            emergency_active,
            fire_active,
            tasks,
            cabins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CabinState;

    fn store() -> Arc<StateStore> {
        StateStore::new(&Config::default())
    }

    #[test]
    fn test_new_store_defaults() {
        let store = store();
        assert_eq!(store.cabin_count(), 10);
        assert!(store.is_running());
        let snap = store.snapshot();
        assert!(!snap.power_low && !snap.emergency_active && !snap.fire_active);
        assert!(snap.cabins.iter().all(|c| c.temperature == 24));
        assert!(snap.cabins.iter().all(|c| c.state == CabinState::Normal));
        assert!(snap.tasks.is_empty());
    }

    #[test]
    fn test_with_cabin_out_of_range_is_none() {
        let store = store();
        assert!(store.with_cabin(10, |c| c.id()).is_none());
        assert_eq!(store.with_cabin(9, |c| c.id()), Some(9));
    }

    #[test]
    fn test_raise_is_sticky() {
        let store = store();
        {
            let mut shared = store.shared();
            shared.raise(AlarmFlag::PowerLow);
        }
        assert!(store.shared().alarm(AlarmFlag::PowerLow));
        assert!(!store.shared().alarm(AlarmFlag::Fire));
    }
}
