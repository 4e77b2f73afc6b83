//! Periodic duty routines: chain watch, power, temperature, lighting.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::routines::{
    PRIORITY_CHAIN, PRIORITY_LIGHTING, PRIORITY_POWER, PRIORITY_TEMP, RunContext, Routine,
};
use crate::state::{AlarmFlag, CabinState};

const CHAIN_INTERVAL: Duration = Duration::from_secs(2);
const POWER_LOW_INTERVAL: Duration = Duration::from_secs(2);
const POWER_OK_INTERVAL: Duration = Duration::from_secs(3);
const TEMP_INTERVAL: Duration = Duration::from_secs(5);
const LIGHTING_INTERVAL: Duration = Duration::from_secs(3);

/// Polls the chain-pull path every two seconds.
///
/// The chain handler raises the emergency flag directly; this routine is
/// the periodic readiness check of the brake linkage.
pub struct ChainWatch;

#[async_trait]
impl Routine for ChainWatch {
    fn name(&self) -> &str {
        "chain-watch"
    }

    fn priority(&self) -> u8 {
        PRIORITY_CHAIN
    }

    fn watch(&self) -> Option<AlarmFlag> {
        None
    }

    async fn service(&self, _ctx: &RunContext) -> Duration {
        debug!("chain linkage checked");
        CHAIN_INTERVAL
    }
}

/// Manages the power budget.
///
/// Runs on a tighter cadence while the low-power flag is set (2s) than in
/// normal operation (3s).
pub struct PowerManager;

#[async_trait]
impl Routine for PowerManager {
    fn name(&self) -> &str {
        "power-manager"
    }

    fn priority(&self) -> u8 {
        PRIORITY_POWER
    }

    fn watch(&self) -> Option<AlarmFlag> {
        None
    }

    async fn service(&self, ctx: &RunContext) -> Duration {
        let low = ctx.store.shared().alarm(AlarmFlag::PowerLow);
        if low {
            let lit = ctx
                .store
                .snapshot()
                .cabins
                .iter()
                .filter(|c| c.light_on)
                .count();
            info!(lights_on = lit, "managing low power state");
            POWER_LOW_INTERVAL
        } else {
            debug!("power budget nominal");
            POWER_OK_INTERVAL
        }
    }
}

/// Regulates temperature in cabins with an adjustment in progress.
///
/// Visits every cabin once per cycle but acts only on cabins currently in
/// `TempAdjust`; each visit is bounded and takes only that cabin's lock.
pub struct TempRegulator;

#[async_trait]
impl Routine for TempRegulator {
    fn name(&self) -> &str {
        "temp-regulator"
    }

    fn priority(&self) -> u8 {
        PRIORITY_TEMP
    }

    fn watch(&self) -> Option<AlarmFlag> {
        None
    }

    async fn service(&self, ctx: &RunContext) -> Duration {
        for cell in ctx.store.cabins() {
            let adjusting = {
                let cabin = cell.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                (cabin.state() == CabinState::TempAdjust).then(|| (cabin.id(), cabin.temperature()))
            };
            if let Some((id, target)) = adjusting {
                debug!(cabin = id, target, "regulating temperature");
            }
        }
        TEMP_INTERVAL
    }
}

/// Sweeps lighting state across the coach.
pub struct LightingSweep;

#[async_trait]
impl Routine for LightingSweep {
    fn name(&self) -> &str {
        "lighting-sweep"
    }

    fn priority(&self) -> u8 {
        PRIORITY_LIGHTING
    }

    fn watch(&self) -> Option<AlarmFlag> {
        None
    }

    async fn service(&self, ctx: &RunContext) -> Duration {
        let lit = ctx
            .store
            .snapshot()
            .cabins
            .iter()
            .filter(|c| c.light_on)
            .count();
        debug!(lights_on = lit, "lighting state swept");
        LIGHTING_INTERVAL
    }
}
