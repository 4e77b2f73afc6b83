//! Read-only snapshots for the presentation collaborator.
//!
//! A snapshot is a point-in-time copy of everything the panel renders:
//! global flags, the task table, and the cabin records. Taking one never
//! holds the global lock and a cabin lock at the same time, so presentation
//! cadence cannot interfere with the runtime's lock discipline.

use std::sync::Arc;

use crate::registry::TaskState;
use crate::state::cabin::{CabinId, CabinState};

/// Point-in-time copy of one task table entry.
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub id: usize,
    pub name: Arc<str>,
    pub priority: u8,
    pub state: TaskState,
    pub active: bool,
    pub execution_count: u64,
}

/// Point-in-time copy of one cabin record.
#[derive(Debug, Clone)]
pub struct CabinSnapshot {
    pub id: CabinId,
    pub light_on: bool,
    pub temperature: i32,
    pub state: CabinState,
}

/// Point-in-time copy of the whole system state.
#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    pub system_running: bool,
    pub power_low: bool,
    pub emergency_active: bool,
    pub fire_active: bool,
    pub tasks: Vec<TaskSnapshot>,
    pub cabins: Vec<CabinSnapshot>,
}
