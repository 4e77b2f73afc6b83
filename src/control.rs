//! Event handlers invoked by the external command listener.
//!
//! [`Controls`] is the entry point the outside world uses to mutate shared
//! state. Every handler follows the same protocol:
//!
//! 1. mutate the relevant sticky flag under the global lock, release;
//! 2. if cabin-scoped, mutate the cabin under its own lock, release;
//! 3. for alarm-class events (fire, emergency, chain pull), request an
//!    advisory preemption and broadcast the wake signal;
//! 4. publish a human-readable event for the presentation collaborator.
//!
//! The global lock and a cabin lock are never held at the same time, so
//! handlers cannot deadlock against runners that iterate cabin locks.
//!
//! Out-of-range cabin indices are silently absorbed; nothing here returns
//! an error.

use std::sync::{Arc, PoisonError};

use tracing::{info, warn};

use crate::command::Command;
use crate::events::{Bus, Event, EventKind};
use crate::render;
use crate::routines::{PRIORITY_CHAIN, PRIORITY_EMERGENCY, PRIORITY_FIRE};
use crate::state::{AlarmFlag, CabinId, CabinState, StateStore};

/// Handlers for externally triggered coach events.
#[derive(Clone)]
pub struct Controls {
    store: Arc<StateStore>,
    bus: Bus,
}

impl Controls {
    pub fn new(store: Arc<StateStore>, bus: Bus) -> Self {
        Self { store, bus }
    }

    /// Number of cabins, for command validation.
    pub fn cabin_count(&self) -> usize {
        self.store.cabin_count()
    }

    /// Routes a parsed command to its handler.
    pub fn dispatch(&self, command: Command) {
        match command {
            Command::Light { cabin, on } => self.set_light(cabin, on),
            Command::Temp { cabin, celsius } => self.set_temperature(cabin, celsius),
            Command::Emergency { cabin } => self.passenger_emergency(cabin),
            Command::Fire { cabin } => self.fire_alert(cabin),
            Command::PowerLow => self.power_low(),
            Command::ChainPull => self.chain_pull(),
            Command::Status => self.status(),
        }
    }

    /// Fire alert: raises the sticky fire flag, escalates the cabin to
    /// `Fire` (cutting its light), and wakes every parked runner.
    ///
    /// Idempotent: a second alert for the same cabin leaves the state
    /// unchanged.
    pub fn fire_alert(&self, cabin: CabinId) {
        if cabin >= self.store.cabin_count() {
            return;
        }
        warn!(cabin, "FIRE ALERT");
        self.store.shared().raise(AlarmFlag::Fire);
        self.store.with_cabin(cabin, |c| c.raise_fire());
        self.preempt(PRIORITY_FIRE);
        self.store.wake_all();
        self.bus.publish(
            Event::now(EventKind::FireAlert)
                .with_cabin(cabin)
                .with_detail("FIRE EMERGENCY!"),
        );
    }

    /// Passenger emergency: raises the sticky emergency flag and escalates
    /// the cabin to `Emergency`.
    pub fn passenger_emergency(&self, cabin: CabinId) {
        if cabin >= self.store.cabin_count() {
            return;
        }
        warn!(cabin, "passenger emergency");
        self.store.shared().raise(AlarmFlag::Emergency);
        self.store.with_cabin(cabin, |c| c.raise_emergency());
        self.preempt(PRIORITY_EMERGENCY);
        self.store.wake_all();
        self.bus.publish(
            Event::now(EventKind::PassengerEmergency)
                .with_cabin(cabin)
                .with_detail("PASSENGER EMERGENCY!"),
        );
    }

    /// Chain pull: raises the sticky emergency flag coach-wide. No cabin is
    /// touched.
    pub fn chain_pull(&self) {
        warn!("chain pulled, emergency stop");
        self.store.shared().raise(AlarmFlag::Emergency);
        self.preempt(PRIORITY_CHAIN);
        self.store.wake_all();
        self.bus
            .publish(Event::now(EventKind::ChainPull).with_detail("CHAIN PULLED!"));
    }

    /// Low power: raises the sticky flag and sheds the light in every cabin
    /// still in a comfort state (`Normal`/`LightOn`). Cabin states are left
    /// untouched; the power manager picks up the flag on its next cycle.
    pub fn power_low(&self) {
        warn!("low power condition reported");
        self.store.shared().raise(AlarmFlag::PowerLow);
        for cell in self.store.cabins() {
            let mut cabin = cell.lock().unwrap_or_else(PoisonError::into_inner);
            if matches!(cabin.state(), CabinState::Normal | CabinState::LightOn) {
                cabin.shed_light();
            }
        }
        self.bus
            .publish(Event::now(EventKind::PowerLow).with_detail("LOW POWER MODE"));
    }

    /// Switches a cabin light per the cabin state machine.
    pub fn set_light(&self, cabin: CabinId, on: bool) {
        if self.store.with_cabin(cabin, |c| c.set_light(on)).is_none() {
            return;
        }
        info!(cabin, on, "cabin light switched");
        self.bus.publish(
            Event::now(EventKind::LightChanged)
                .with_cabin(cabin)
                .with_detail(if on { "ON" } else { "OFF" }),
        );
    }

    /// Retargets a cabin temperature per the cabin state machine.
    pub fn set_temperature(&self, cabin: CabinId, celsius: i32) {
        if self
            .store
            .with_cabin(cabin, |c| c.set_temperature(celsius))
            .is_none()
        {
            return;
        }
        info!(cabin, celsius, "cabin temperature retargeted");
        self.bus.publish(
            Event::now(EventKind::TempAdjusted)
                .with_cabin(cabin)
                .with_detail(format!("{celsius}\u{b0}C")),
        );
    }

    /// Publishes an immediate full status dump for the presentation
    /// collaborator.
    pub fn status(&self) {
        let dump = render::status_dump(&self.store.snapshot());
        self.bus
            .publish(Event::now(EventKind::StatusReport).with_detail(dump));
    }

    /// Advisory preemption request: logs and broadcasts the wake signal.
    ///
    /// Performs no reordering: every runner is scheduled by the tokio
    /// runtime, and the priority value influences nothing about execution
    /// order.
    pub fn preempt(&self, priority: u8) {
        info!(priority, "preemption requested (advisory)");
        self.store.wake_all();
    }
}
