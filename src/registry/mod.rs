//! Task registry: bounded table and runner lifecycle.
//!
//! ## Contents
//! - [`TaskTable`], [`TaskEntry`], [`TaskState`], [`TaskId`] — the bounded
//!   descriptor table, embedded in the state store under the global lock
//! - [`Registry`] — the lifecycle component: registers routines, starts one
//!   runner per task, and drives the ordered shutdown sequence
//!
//! ## Advisory priority
//! The table answers [`TaskTable::highest_priority_ready`], but no dispatch
//! path consults it: every registered task runs as its own tokio task,
//! scheduled by the runtime. The priority field is informational only.

mod registry;
mod table;

pub use registry::Registry;
pub use table::{TaskEntry, TaskId, TaskState, TaskTable};
