//! Supervisor: wires the runtime together and drives shutdown.
//!
//! The [`Supervisor`] owns the state store, the event bus, the registry, and
//! the subscriber list. It registers the standard routine set, forwards bus
//! events to subscribers, and turns an OS termination signal into the
//! ordered stop sequence.
//!
//! ## High-level architecture
//! ```text
//! commands (stdin) ─► listener ─► Controls ──┐
//!                                            ▼
//!                       ┌──────────── StateStore ───────────┐
//!                       │  global lock: flags + task table  │
//!                       │  per-cabin locks · wake Notify    │
//!                       └──────┬────────────────────────────┘
//!                              │ polled / woken
//!            TaskRunner × N (one per registered routine)
//!                              │ publish
//!                              ▼
//!                             Bus ─► subscriber_listener ─► LogWriter
//!                              ▲                            StatusPanel
//!              Controls, Registry, Supervisor
//!
//! Shutdown path:
//!   wait_for_shutdown_signal()
//!     └─► Bus.publish(ShutdownRequested)
//!     └─► Registry::stop_all():
//!           mark inactive ─► wake_all ─► cancel token ─► join (≤ grace)
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::control::Controls;
use crate::core::shutdown;
use crate::error::{RegistryError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::registry::Registry;
use crate::routines::{
    ChainWatch, DisplayRefresh, EmergencyWatch, FireWatch, LightingSweep, LogTicker, PowerManager,
    TempRegulator,
};
use crate::state::StateStore;
use crate::subscribers::Subscribe;

/// Coordinates the state store, registry, runners, and subscriber fan-out.
pub struct Supervisor {
    cfg: Config,
    store: Arc<StateStore>,
    bus: Bus,
    registry: Arc<Registry>,
    subs: Vec<Arc<dyn Subscribe>>,
    token: CancellationToken,
}

impl Supervisor {
    /// Builds the runtime: store, bus, registry, and the given subscribers.
    pub fn new(cfg: Config, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let store = StateStore::new(&cfg);
        let bus = Bus::new(cfg.bus_capacity);
        let token = CancellationToken::new();
        let registry = Registry::new(store.clone(), bus.clone(), token.clone(), cfg.grace);
        Self {
            cfg,
            store,
            bus,
            registry,
            subs,
            token,
        }
    }

    /// The shared state store.
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// The task registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The runtime event bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// A handle for the external command listener and tests: cancelling it
    /// initiates shutdown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Event handlers for the external command listener.
    pub fn controls(&self) -> Controls {
        Controls::new(self.store.clone(), self.bus.clone())
    }

    /// Registers the standard coach routine set (eight tasks, priorities
    /// 10 down to 1), filling the table to capacity.
    pub fn register_defaults(&self) -> Result<(), RegistryError> {
        self.registry.register(Arc::new(FireWatch))?;
        self.registry.register(Arc::new(EmergencyWatch))?;
        self.registry.register(Arc::new(ChainWatch))?;
        self.registry.register(Arc::new(PowerManager))?;
        self.registry.register(Arc::new(TempRegulator))?;
        self.registry.register(Arc::new(LightingSweep))?;
        self.registry.register(Arc::new(DisplayRefresh::new()))?;
        self.registry.register(Arc::new(LogTicker))?;
        Ok(())
    }

    /// Runs until a termination signal (or an external cancellation of the
    /// runtime token), then drives the ordered stop sequence.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.subscriber_listener();
        self.registry.start_all().await;
        info!(
            cabins = self.cfg.cabin_count,
            tasks = self.store.shared().tasks.len(),
            "system running"
        );

        tokio::select! {
            res = shutdown::wait_for_shutdown_signal() => {
                if let Err(err) = res {
                    warn!(%err, "signal listener failed; shutting down");
                }
                info!("shutdown signal received");
            }
            _ = self.token.cancelled() => {
                info!("runtime token cancelled");
            }
        }

        self.bus.publish(Event::now(EventKind::ShutdownRequested));
        self.registry.stop_all().await
    }

    /// Forwards every bus event to the subscriber list, in order.
    ///
    /// Lagged receivers skip the missed window and keep going; the listener
    /// only exits when the bus closes.
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = self.subs.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        for sub in &subs {
                            sub.on_event(&ev).await;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "subscriber listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}
