//! Textual rendering of system snapshots.
//!
//! Pure functions from [`SystemSnapshot`] to the status dump consumed by
//! the presentation collaborator (the `STATUS` response and the periodic
//! panel refresh). Rendering never touches live state.

use std::fmt::Write;

use crate::state::SystemSnapshot;

/// Renders the full status dump: global flags, task table, cabin table.
pub fn status_dump(snap: &SystemSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== COACH SYSTEM STATUS ===");
    let _ = writeln!(
        out,
        "running: {}  power_low: {}  emergency: {}  fire: {}",
        yes_no(snap.system_running),
        yes_no(snap.power_low),
        yes_no(snap.emergency_active),
        yes_no(snap.fire_active),
    );

    let _ = writeln!(out, "\nTasks ({}):", snap.tasks.len());
    let _ = writeln!(
        out,
        "{:<3} {:<20} {:>8} {:<10} {:>6} {:>10}",
        "ID", "Name", "Priority", "State", "Active", "Exec"
    );
    for task in &snap.tasks {
        let _ = writeln!(
            out,
            "{:<3} {:<20} {:>8} {:<10} {:>6} {:>10}",
            task.id,
            task.name,
            task.priority,
            task.state.label(),
            yes_no(task.active),
            task.execution_count,
        );
    }

    let _ = writeln!(out, "\nCabins ({}):", snap.cabins.len());
    let _ = writeln!(
        out,
        "{:<5} {:<6} {:>8} {:<10}",
        "Cabin", "Light", "Temp(C)", "State"
    );
    for cabin in &snap.cabins {
        let _ = writeln!(
            out,
            "{:<5} {:<6} {:>8} {:<10}",
            cabin.id,
            if cabin.light_on { "ON" } else { "OFF" },
            cabin.temperature,
            cabin.state.label(),
        );
    }
    let _ = writeln!(out, "===========================");

    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CabinSnapshot, CabinState};

    fn snapshot() -> SystemSnapshot {
        SystemSnapshot {
            system_running: true,
            power_low: false,
            emergency_active: false,
            fire_active: true,
            tasks: Vec::new(),
            cabins: vec![
                CabinSnapshot {
                    id: 0,
                    light_on: true,
                    temperature: 24,
                    state: CabinState::LightOn,
                },
                CabinSnapshot {
                    id: 1,
                    light_on: false,
                    temperature: 18,
                    state: CabinState::TempAdjust,
                },
            ],
        }
    }

    #[test]
    fn test_dump_contains_flags_and_cabin_rows() {
        let dump = status_dump(&snapshot());
        assert!(dump.contains("fire: YES"));
        assert!(dump.contains("power_low: NO"));
        assert!(dump.contains("Light On"));
        assert!(dump.contains("Temp Adj"));
        assert!(dump.contains("18"));
    }
}
