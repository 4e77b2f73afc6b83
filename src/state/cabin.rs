//! Per-cabin record and state machine.
//!
//! A cabin tracks lighting, temperature, and safety state. The state machine
//! is deliberately asymmetric: comfort operations (light, temperature) only
//! move a cabin between `Normal`, `LightOn`, and `TempAdjust`, while safety
//! escalations (`Emergency`, `Fire`) override and are terminal; no
//! operation returns a cabin from either.
//!
//! Comfort side effects still land while a cabin is escalated: switching the
//! light or retargeting the temperature updates the field without touching
//! the state.

/// Index of a cabin, `0..cabin_count`. Stable for the process lifetime.
pub type CabinId = usize;

/// Safety/comfort state of a single cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinState {
    /// Idle: light off, no temperature adjustment in progress.
    Normal,
    /// Light switched on from `Normal`.
    LightOn,
    /// Temperature adjustment requested from `Normal`.
    TempAdjust,
    /// Passenger emergency. Terminal.
    Emergency,
    /// Fire alert. Terminal; entering it cuts the light.
    Fire,
}

impl CabinState {
    /// Short display label for the status panel.
    pub fn label(self) -> &'static str {
        match self {
            CabinState::Normal => "Normal",
            CabinState::LightOn => "Light On",
            CabinState::TempAdjust => "Temp Adj",
            CabinState::Emergency => "EMERGENCY",
            CabinState::Fire => "FIRE",
        }
    }
}

/// One passenger compartment.
///
/// Mutated only under its own lock (see [`StateStore`](super::StateStore));
/// the identity `id` is immutable after creation.
#[derive(Debug, Clone)]
pub struct Cabin {
    id: CabinId,
    light_on: bool,
    temperature: i32,
    state: CabinState,
}

impl Cabin {
    /// Creates a cabin in `Normal` state with the light off.
    pub fn new(id: CabinId, temperature: i32) -> Self {
        Self {
            id,
            light_on: false,
            temperature,
            state: CabinState::Normal,
        }
    }

    pub fn id(&self) -> CabinId {
        self.id
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    pub fn state(&self) -> CabinState {
        self.state
    }

    /// Switches the light.
    ///
    /// The flag always follows the request. State only moves between
    /// `Normal` and `LightOn`; in any other state the flag is toggled and
    /// the state is left untouched.
    pub fn set_light(&mut self, on: bool) {
        self.light_on = on;
        match (on, self.state) {
            (true, CabinState::Normal) => self.state = CabinState::LightOn,
            (false, CabinState::LightOn) => self.state = CabinState::Normal,
            _ => {}
        }
    }

    /// Retargets the temperature.
    ///
    /// The target always lands; the state moves to `TempAdjust` only from
    /// `Normal`.
    pub fn set_temperature(&mut self, celsius: i32) {
        self.temperature = celsius;
        if self.state == CabinState::Normal {
            self.state = CabinState::TempAdjust;
        }
    }

    /// Escalates to `Emergency` from any state.
    pub fn raise_emergency(&mut self) {
        self.state = CabinState::Emergency;
    }

    /// Escalates to `Fire` from any state and cuts the light.
    pub fn raise_fire(&mut self) {
        self.state = CabinState::Fire;
        self.light_on = false;
    }

    /// Cuts the light without touching the state (power saving).
    pub fn shed_light(&mut self) {
        self.light_on = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_on_from_normal() {
        let mut cabin = Cabin::new(0, 24);
        cabin.set_light(true);
        assert!(cabin.light_on());
        assert_eq!(cabin.state(), CabinState::LightOn);
    }

    #[test]
    fn test_light_off_returns_to_normal() {
        let mut cabin = Cabin::new(0, 24);
        cabin.set_light(true);
        cabin.set_light(false);
        assert!(!cabin.light_on());
        assert_eq!(cabin.state(), CabinState::Normal);
    }

    #[test]
    fn test_light_toggle_never_leaves_escalated_states() {
        for raise in [Cabin::raise_emergency, Cabin::raise_fire] {
            let mut cabin = Cabin::new(2, 24);
            raise(&mut cabin);
            let escalated = cabin.state();

            cabin.set_light(true);
            assert!(cabin.light_on());
            assert_eq!(cabin.state(), escalated);

            cabin.set_light(false);
            assert!(!cabin.light_on());
            assert_eq!(cabin.state(), escalated);
        }
    }

    #[test]
    fn test_light_toggle_preserves_temp_adjust() {
        let mut cabin = Cabin::new(1, 24);
        cabin.set_temperature(18);
        cabin.set_light(true);
        assert!(cabin.light_on());
        assert_eq!(cabin.state(), CabinState::TempAdjust);
    }

    #[test]
    fn test_temperature_from_normal_enters_temp_adjust() {
        let mut cabin = Cabin::new(0, 24);
        cabin.set_temperature(18);
        assert_eq!(cabin.temperature(), 18);
        assert_eq!(cabin.state(), CabinState::TempAdjust);
    }

    #[test]
    fn test_temperature_applies_without_state_change_elsewhere() {
        let mut cabin = Cabin::new(0, 24);
        cabin.raise_emergency();
        cabin.set_temperature(30);
        assert_eq!(cabin.temperature(), 30);
        assert_eq!(cabin.state(), CabinState::Emergency);
    }

    #[test]
    fn test_fire_cuts_light_and_is_terminal() {
        let mut cabin = Cabin::new(3, 24);
        cabin.set_light(true);
        cabin.raise_fire();
        assert!(!cabin.light_on());
        assert_eq!(cabin.state(), CabinState::Fire);

        // Nothing comfort-side brings it back.
        cabin.set_light(false);
        cabin.set_temperature(20);
        assert_eq!(cabin.state(), CabinState::Fire);
    }

    #[test]
    fn test_shed_light_keeps_state() {
        let mut cabin = Cabin::new(4, 24);
        cabin.set_light(true);
        cabin.shed_light();
        assert!(!cabin.light_on());
        assert_eq!(cabin.state(), CabinState::LightOn);
    }
}
