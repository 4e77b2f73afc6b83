//! Bounded task descriptor table.
//!
//! The table is pure data: it is embedded in the state store's [`Shared`]
//! record and mutated only while the global lock is held. Capacity is fixed
//! at construction; ids are assigned sequentially and entries are never
//! removed, so `len()` grows only.
//!
//! Out-of-range ids are absorbed silently everywhere a runner can hand one
//! in (`record_completion`, `set_state`); only registration reports errors.

use std::sync::Arc;
use std::time::Instant;

use crate::error::RegistryError;
use crate::state::TaskSnapshot;

/// Index of a task in the table. Assigned sequentially at registration.
pub type TaskId = usize;

/// Execution state of a task, as recorded in its descriptor.
///
/// `Blocked` and `Suspended` are reserved: the base protocol parks waiting
/// tasks in `Ready` and nothing transitions into either, but both are kept
/// in the model for parity with the descriptor layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Ready,
    Running,
    Blocked,
    Suspended,
}

impl TaskState {
    /// Short display label for the status panel.
    pub fn label(self) -> &'static str {
        match self {
            TaskState::Ready => "READY",
            TaskState::Running => "RUNNING",
            TaskState::Blocked => "BLOCKED",
            TaskState::Suspended => "SUSPENDED",
        }
    }
}

/// One task descriptor.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Sequential id, immutable after registration.
    pub id: TaskId,
    /// Display name.
    pub name: Arc<str>,
    /// Advisory priority, higher = more urgent. Fixed at registration.
    pub priority: u8,
    /// Current execution state, owned by the task's runner.
    pub state: TaskState,
    /// Lifecycle flag; cleared by the registry during shutdown (or when the
    /// runner could not be started).
    pub active: bool,
    /// Completed service cycles. Monotonically increasing.
    pub execution_count: u64,
    /// Time of the most recent completed cycle.
    pub last_execution: Instant,
}

/// Fixed-capacity task descriptor table.
#[derive(Debug)]
pub struct TaskTable {
    entries: Vec<TaskEntry>,
    capacity: usize,
}

impl TaskTable {
    /// Creates an empty table with the given fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of registered tasks. Grows only.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a descriptor with the next sequential id.
    ///
    /// New entries start `Ready`, active, with a zero execution count.
    /// Fails with [`RegistryError::CapacityExceeded`] when the table is
    /// full; the table is left untouched in that case.
    pub fn register(&mut self, name: &str, priority: u8) -> Result<TaskId, RegistryError> {
        if self.entries.len() >= self.capacity {
            return Err(RegistryError::CapacityExceeded {
                name: name.to_string(),
                capacity: self.capacity,
            });
        }
        let id = self.entries.len();
        self.entries.push(TaskEntry {
            id,
            name: Arc::from(name),
            priority,
            state: TaskState::Ready,
            active: true,
            execution_count: 0,
            last_execution: Instant::now(),
        });
        Ok(id)
    }

    /// Returns the descriptor for `id`, if registered.
    pub fn entry(&self, id: TaskId) -> Option<&TaskEntry> {
        self.entries.get(id)
    }

    /// Returns the display name for `id`, if registered.
    pub fn name_of(&self, id: TaskId) -> Option<Arc<str>> {
        self.entries.get(id).map(|e| e.name.clone())
    }

    /// True if `id` is registered and its lifecycle flag is set.
    ///
    /// Unknown ids read as inactive.
    pub fn is_active(&self, id: TaskId) -> bool {
        self.entries.get(id).is_some_and(|e| e.active)
    }

    /// Records a completed service cycle: bumps the counter and refreshes
    /// the timestamp. Out-of-range ids are ignored.
    pub fn record_completion(&mut self, id: TaskId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.execution_count += 1;
            entry.last_execution = Instant::now();
        }
    }

    /// Sets the execution state for `id`. Out-of-range ids are ignored.
    pub fn set_state(&mut self, id: TaskId, state: TaskState) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.state = state;
        }
    }

    /// Clears the lifecycle flag for `id`. Out-of-range ids are ignored.
    pub fn deactivate(&mut self, id: TaskId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.active = false;
        }
    }

    /// Clears every lifecycle flag (shutdown step one).
    pub fn mark_all_inactive(&mut self) {
        for entry in &mut self.entries {
            entry.active = false;
        }
    }

    /// Returns the active `Ready` task with the strictly greatest priority.
    ///
    /// Ties resolve to the earliest-registered entry: a candidate replaces
    /// the current best only on a strictly greater priority. Pure query;
    /// nothing in the dispatch path calls it.
    pub fn highest_priority_ready(&self) -> Option<TaskId> {
        let mut best: Option<&TaskEntry> = None;
        for entry in &self.entries {
            if !entry.active || entry.state != TaskState::Ready {
                continue;
            }
            match best {
                Some(current) if entry.priority <= current.priority => {}
                _ => best = Some(entry),
            }
        }
        best.map(|e| e.id)
    }

    /// Copies every descriptor into presentation rows.
    pub fn snapshot(&self) -> Vec<TaskSnapshot> {
        self.entries
            .iter()
            .map(|e| TaskSnapshot {
                id: e.id,
                name: e.name.clone(),
                priority: e.priority,
                state: e.state,
                active: e.active,
                execution_count: e.execution_count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> TaskTable {
        let mut table = TaskTable::new(8);
        for i in 0..8 {
            table.register(&format!("task-{i}"), i as u8).unwrap();
        }
        table
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut table = TaskTable::new(4);
        assert_eq!(table.register("a", 1).unwrap(), 0);
        assert_eq!(table.register("b", 2).unwrap(), 1);
        assert_eq!(table.register("c", 3).unwrap(), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_register_ninth_task_is_capacity_exceeded() {
        let mut table = full_table();
        let err = table.register("ninth", 5).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::CapacityExceeded { capacity: 8, .. }
        ));
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_new_entry_is_ready_active_zero_count() {
        let mut table = TaskTable::new(2);
        let id = table.register("fresh", 7).unwrap();
        let entry = table.entry(id).unwrap();
        assert_eq!(entry.state, TaskState::Ready);
        assert!(entry.active);
        assert_eq!(entry.execution_count, 0);
    }

    #[test]
    fn test_record_completion_bumps_count() {
        let mut table = TaskTable::new(2);
        let id = table.register("worker", 1).unwrap();
        table.record_completion(id);
        table.record_completion(id);
        assert_eq!(table.entry(id).unwrap().execution_count, 2);
    }

    #[test]
    fn test_record_completion_ignores_unknown_id() {
        let mut table = TaskTable::new(2);
        table.register("worker", 1).unwrap();
        table.record_completion(99);
        assert_eq!(table.entry(0).unwrap().execution_count, 0);
    }

    #[test]
    fn test_highest_priority_ready_picks_strict_max() {
        let mut table = TaskTable::new(4);
        table.register("low", 1).unwrap();
        table.register("high", 9).unwrap();
        table.register("mid", 5).unwrap();
        assert_eq!(table.highest_priority_ready(), Some(1));
    }

    #[test]
    fn test_highest_priority_tie_goes_to_earliest() {
        let mut table = TaskTable::new(4);
        table.register("first", 5).unwrap();
        table.register("second", 5).unwrap();
        table.register("third", 3).unwrap();
        assert_eq!(table.highest_priority_ready(), Some(0));
    }

    #[test]
    fn test_highest_priority_skips_non_ready_and_inactive() {
        let mut table = TaskTable::new(4);
        table.register("running", 9).unwrap();
        table.register("inactive", 8).unwrap();
        table.register("ready", 2).unwrap();
        table.set_state(0, TaskState::Running);
        table.deactivate(1);
        assert_eq!(table.highest_priority_ready(), Some(2));
    }

    #[test]
    fn test_highest_priority_empty_table_is_none() {
        let table = TaskTable::new(4);
        assert_eq!(table.highest_priority_ready(), None);
    }

    #[test]
    fn test_mark_all_inactive() {
        let mut table = full_table();
        table.mark_all_inactive();
        assert!(!table.is_active(0));
        assert!(!table.is_active(7));
        assert_eq!(table.highest_priority_ready(), None);
    }
}
