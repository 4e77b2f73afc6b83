//! Error types used by the coachvisor runtime.
//!
//! Two enums cover the whole taxonomy:
//!
//! - [`RegistryError`] — failures while registering or starting tasks.
//! - [`RuntimeError`] — failures raised by the runtime itself (shutdown).
//!
//! Invalid cabin indices and invalid task ids are deliberately *not* errors:
//! the command listener drops bad input and the task table ignores unknown
//! ids, so neither ever surfaces to a caller. There is no fatal error class;
//! the process only terminates through the shutdown sequence.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while registering or starting tasks.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The task table already holds its maximum number of entries.
    ///
    /// The specific registration is aborted; previously registered tasks are
    /// unaffected and the system keeps running.
    #[error("task table full ({capacity} entries), cannot register {name:?}")]
    CapacityExceeded {
        /// Name of the task that could not be registered.
        name: String,
        /// The fixed table capacity.
        capacity: usize,
    },

    /// A runner could not be started for a registered task.
    ///
    /// Caught per-task during `start_all`: the task is marked inactive and
    /// startup continues for the remaining tasks.
    #[error("failed to start runner for task {name:?}")]
    SpawnFailed {
        /// Name of the task whose runner could not be started.
        name: String,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::CapacityExceeded { .. } => "registry_capacity_exceeded",
            RegistryError::SpawnFailed { .. } => "registry_spawn_failed",
        }
    }
}

/// Errors raised by the runtime itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown join exceeded the configured grace period.
    ///
    /// All runners were asked to stop (inactive flags set, wake signal
    /// broadcast, token cancelled) but some did not exit in time.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of tasks whose runners did not exit in time.
        stuck: Vec<String>,
    },

    /// A registration or startup error bubbled out of supervisor wiring.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::Registry(e) => e.as_label(),
        }
    }
}
