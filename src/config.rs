//! Global runtime configuration.
//!
//! [`Config`] centralizes the fixed capacities and runtime settings of the
//! coach controller. It is consumed once at construction time
//! (`Supervisor::new`); capacities never change afterwards.

use std::time::Duration;

/// Global configuration for the coach supervision runtime.
///
/// ## Field semantics
/// - `cabin_count`: number of cabins created at startup (fixed for the
///   process lifetime; also the upper bound for cabin-scoped commands)
/// - `task_capacity`: maximum number of registrable tasks
/// - `default_temperature`: initial per-cabin temperature in °C
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus)
/// - `grace`: shutdown join bound; must exceed the longest routine idle
///   interval, or healthy runners can be misreported as stuck
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of cabins tracked by the state store.
    pub cabin_count: usize,
    /// Maximum number of entries in the task table.
    pub task_capacity: usize,
    /// Initial temperature for every cabin, in degrees Celsius.
    pub default_temperature: i32,
    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
    /// Maximum time to wait for runners to exit during shutdown.
    pub grace: Duration,
}

impl Default for Config {
    /// Defaults mirror the deployed coach layout:
    /// - `cabin_count = 10`
    /// - `task_capacity = 8`
    /// - `default_temperature = 24` °C
    /// - `bus_capacity = 256`
    /// - `grace = 12s` (the slowest routine idles for 10s)
    fn default() -> Self {
        Self {
            cabin_count: 10,
            task_capacity: 8,
            default_temperature: 24,
            bus_capacity: 256,
            grace: Duration::from_secs(12),
        }
    }
}
