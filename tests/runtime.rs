//! End-to-end runtime behavior: registration contracts, advisory priority,
//! alarm handling, and the ordered shutdown sequence.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};

use coachvisor::{
    AlarmFlag, CabinState, Command, Config, EventKind, RegistryError, Routine, RunContext,
    Supervisor, parse,
};

/// Minimal configurable routine for driving the runner loops quickly.
struct TestRoutine {
    name: &'static str,
    priority: u8,
    watch: Option<AlarmFlag>,
    idle: Duration,
}

impl TestRoutine {
    fn periodic(name: &'static str, priority: u8) -> Arc<Self> {
        Arc::new(Self {
            name,
            priority,
            watch: None,
            idle: Duration::from_millis(10),
        })
    }

    fn watcher(name: &'static str, priority: u8, flag: AlarmFlag) -> Arc<Self> {
        Arc::new(Self {
            name,
            priority,
            watch: Some(flag),
            idle: Duration::from_millis(10),
        })
    }
}

#[async_trait]
impl Routine for TestRoutine {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn watch(&self) -> Option<AlarmFlag> {
        self.watch
    }

    async fn service(&self, _ctx: &RunContext) -> Duration {
        self.idle
    }
}

fn supervisor() -> Supervisor {
    Supervisor::new(Config::default(), Vec::new())
}

#[tokio::test]
async fn test_ninth_registration_is_capacity_exceeded() {
    let sup = supervisor();
    for i in 0..8 {
        let routine = TestRoutine::periodic(Box::leak(format!("task-{i}").into_boxed_str()), 1);
        sup.registry().register(routine).unwrap();
    }

    let err = sup
        .registry()
        .register(TestRoutine::periodic("ninth", 5))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::CapacityExceeded { capacity: 8, .. }
    ));
    assert_eq!(sup.store().shared().tasks.len(), 8);
}

#[tokio::test]
async fn test_priority_tie_resolves_to_earliest_registered() {
    let sup = supervisor();
    let first = sup
        .registry()
        .register(TestRoutine::periodic("first", 5))
        .unwrap();
    sup.registry()
        .register(TestRoutine::periodic("second", 5))
        .unwrap();
    sup.registry()
        .register(TestRoutine::periodic("third", 2))
        .unwrap();

    assert_eq!(
        sup.store().shared().tasks.highest_priority_ready(),
        Some(first)
    );
}

#[tokio::test]
async fn test_fire_alert_is_idempotent() {
    let sup = supervisor();
    let controls = sup.controls();

    controls.set_light(3, true);
    controls.fire_alert(3);
    controls.fire_alert(3);

    let snap = sup.store().snapshot();
    assert!(snap.fire_active);
    assert_eq!(snap.cabins[3].state, CabinState::Fire);
    assert!(!snap.cabins[3].light_on);
    // Other cabins untouched.
    assert_eq!(snap.cabins[4].state, CabinState::Normal);
}

#[tokio::test]
async fn test_light_toggle_preserves_escalated_cabin_states() {
    let sup = supervisor();
    let controls = sup.controls();

    controls.fire_alert(1);
    controls.passenger_emergency(2);
    controls.set_temperature(3, 19);

    for (cabin, state) in [
        (1, CabinState::Fire),
        (2, CabinState::Emergency),
        (3, CabinState::TempAdjust),
    ] {
        controls.set_light(cabin, true);
        let snap = sup.store().snapshot();
        assert!(snap.cabins[cabin].light_on);
        assert_eq!(snap.cabins[cabin].state, state);

        controls.set_light(cabin, false);
        let snap = sup.store().snapshot();
        assert!(!snap.cabins[cabin].light_on);
        assert_eq!(snap.cabins[cabin].state, state);
    }
}

#[tokio::test]
async fn test_out_of_range_cabin_is_silently_absorbed() {
    let sup = supervisor();
    let controls = sup.controls();

    controls.fire_alert(10);
    controls.set_light(99, true);
    controls.set_temperature(10, 30);

    let snap = sup.store().snapshot();
    assert!(!snap.fire_active);
    assert!(snap.cabins.iter().all(|c| c.state == CabinState::Normal));
}

/// Priority is advisory only: a high-priority watcher and a low-priority
/// periodic task both make progress, with no starvation in either
/// direction.
#[tokio::test]
async fn test_both_runner_shapes_make_progress() {
    let sup = supervisor();
    let watcher = sup
        .registry()
        .register(TestRoutine::watcher("hot-watcher", 10, AlarmFlag::Fire))
        .unwrap();
    let ticker = sup
        .registry()
        .register(TestRoutine::periodic("slow-ticker", 1))
        .unwrap();

    sup.registry().start_all().await;
    // Raise the watched flag so the event-driven runner has work.
    sup.controls().fire_alert(0);

    sleep(Duration::from_millis(150)).await;
    let first = sup.store().snapshot();
    sleep(Duration::from_millis(150)).await;
    let second = sup.store().snapshot();

    for id in [watcher, ticker] {
        assert!(
            first.tasks[id].execution_count > 0,
            "task {id} never executed"
        );
        assert!(
            second.tasks[id].execution_count > first.tasks[id].execution_count,
            "task {id} stopped making progress"
        );
    }

    sup.registry().stop_all().await.unwrap();
}

/// Shutdown while a watcher is parked on the wake signal: the ordered stop
/// sequence (mark inactive → broadcast → join) releases it without a
/// deadlock.
#[tokio::test]
async fn test_shutdown_releases_blocked_watcher() {
    let sup = supervisor();
    sup.registry()
        .register(TestRoutine::watcher("parked", 9, AlarmFlag::Emergency))
        .unwrap();
    sup.registry()
        .register(TestRoutine::periodic("ticker", 1))
        .unwrap();

    sup.registry().start_all().await;
    // Let the watcher reach the parked state (flag never raised).
    sleep(Duration::from_millis(50)).await;

    timeout(Duration::from_secs(5), sup.registry().stop_all())
        .await
        .expect("shutdown deadlocked")
        .expect("shutdown reported stuck tasks");

    let snap = sup.store().snapshot();
    assert!(!snap.system_running);
    assert!(snap.tasks.iter().all(|t| !t.active));
}

/// `TEMP 2 18` then `STATUS` through the real command grammar: cabin 2
/// reports the new target and the `TempAdjust` state in the dump.
#[tokio::test]
async fn test_temp_then_status_flow() {
    let sup = supervisor();
    let controls = sup.controls();
    let cabins = controls.cabin_count();

    controls.dispatch(parse("TEMP 2 18", cabins).unwrap());

    let mut rx = sup.bus().subscribe();
    controls.dispatch(parse("STATUS", cabins).unwrap());

    let report = loop {
        let ev = rx.recv().await.unwrap();
        if ev.kind == EventKind::StatusReport {
            break ev;
        }
    };
    let dump = report.detail.expect("status report carries the dump");
    assert!(dump.contains("Temp Adj"));
    assert!(dump.contains("18"));

    let snap = sup.store().snapshot();
    assert_eq!(snap.cabins[2].temperature, 18);
    assert_eq!(snap.cabins[2].state, CabinState::TempAdjust);
}

#[tokio::test]
async fn test_power_low_sheds_comfort_lights_only() {
    let sup = supervisor();
    let controls = sup.controls();

    controls.set_light(0, true);
    controls.set_light(1, true);
    controls.fire_alert(2);
    controls.passenger_emergency(3);

    controls.power_low();

    let snap = sup.store().snapshot();
    assert!(snap.power_low);
    // Comfort cabins lose the light but keep their state.
    assert!(!snap.cabins[0].light_on);
    assert_eq!(snap.cabins[0].state, CabinState::LightOn);
    assert!(!snap.cabins[1].light_on);
    // Escalated cabins are not swept.
    assert_eq!(snap.cabins[2].state, CabinState::Fire);
    assert_eq!(snap.cabins[3].state, CabinState::Emergency);
}

/// The command grammar drives the same handlers the serial link uses.
#[tokio::test]
async fn test_command_dispatch_matrix() {
    let sup = supervisor();
    let controls = sup.controls();
    let cabins = controls.cabin_count();

    for line in ["LIGHT 0 ON", "EMERGENCY 4", "FIRE 5", "POWER LOW", "CHAIN"] {
        controls.dispatch(parse(line, cabins).unwrap());
    }
    assert_eq!(parse("LIGHT 10 ON", cabins), None);
    assert_eq!(parse("TEMP 2", cabins), None);

    let snap = sup.store().snapshot();
    assert_eq!(snap.cabins[0].state, CabinState::LightOn);
    assert_eq!(snap.cabins[4].state, CabinState::Emergency);
    assert_eq!(snap.cabins[5].state, CabinState::Fire);
    assert!(snap.power_low);
    assert!(snap.emergency_active);
    assert!(snap.fire_active);
}

/// A watcher parked before the alarm is raised is released by the handler's
/// wake broadcast and starts accumulating executions.
#[tokio::test]
async fn test_wake_broadcast_releases_parked_watcher() {
    let sup = supervisor();
    let watcher = sup
        .registry()
        .register(TestRoutine::watcher("fire-sentinel", 10, AlarmFlag::Fire))
        .unwrap();

    sup.registry().start_all().await;
    sleep(Duration::from_millis(50)).await;
    assert_eq!(
        sup.store().snapshot().tasks[watcher].execution_count,
        0,
        "watcher must stay parked until the flag is raised"
    );

    sup.controls().fire_alert(7);
    sleep(Duration::from_millis(150)).await;
    assert!(
        sup.store().snapshot().tasks[watcher].execution_count > 0,
        "broadcast did not release the parked watcher"
    );

    sup.registry().stop_all().await.unwrap();
}

/// Commands parsed from a line stream end-to-end (listener grammar), then a
/// full supervisor-managed shutdown via the cancellation token.
#[tokio::test]
async fn test_listener_lines_and_token_shutdown() {
    use tokio::io::BufReader;

    let sup = supervisor();
    sup.register_defaults().unwrap();

    let input: &[u8] = b"LIGHT 1 ON\nTEMP 6 21\nnot a command\nFIRE 0\n";
    let listener = tokio::spawn(coachvisor::listen(
        BufReader::new(input),
        sup.controls(),
        sup.cancellation_token(),
    ));
    listener.await.unwrap();

    let snap = sup.store().snapshot();
    assert_eq!(snap.cabins[1].state, CabinState::LightOn);
    assert_eq!(snap.cabins[6].temperature, 21);
    assert_eq!(snap.cabins[0].state, CabinState::Fire);

    // Supervisor::run would block on OS signals; exercise the registry
    // stop path the way run() drives it.
    timeout(Duration::from_secs(5), sup.registry().stop_all())
        .await
        .expect("shutdown deadlocked")
        .unwrap();
}

#[tokio::test]
async fn test_commands_enum_shape() {
    assert_eq!(
        parse("LIGHT 3 ON", 10),
        Some(Command::Light { cabin: 3, on: true })
    );
    assert_eq!(
        parse("TEMP 2 18", 10),
        Some(Command::Temp { cabin: 2, celsius: 18 })
    );
}
