//! Tick loop
//!
//! One tick: apply held trim input, run the controller on the current
//! vessel state, hand the commands to the motion model, advance it, then
//! record the track. Rendering reads the results through `telemetry`.

use control::{ControlMode, NavStatus, NavigationConfig, Navigator, TrimInput};
use log::{debug, info};
use mechanics::{TrackRecorder, Vessel};
use serde::Serialize;
use simcore::{
    ActuatorInput, ControlModel, FixedTimestep, MPS_TO_KNOTS, MechanicsModel, Model, SimContext,
};

use crate::error::AppError;
use crate::scenario::ScenarioConfig;

/// Display snapshot after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telemetry {
    pub t: f64,
    pub lat: f64,
    pub lon: f64,
    pub speed_kts: f64,
    pub heading_deg: f64,
    pub thrust: f64,
    pub rudder: f64,
    pub distance_travelled_m: f64,
    pub nav: NavStatus,
}

pub struct Simulation {
    vessel: Vessel,
    navigator: Navigator,
    initial_navigator: Navigator,
    track: TrackRecorder,
    clock: FixedTimestep,
    trim: TrimInput,
    ticks: u64,
}

impl Simulation {
    pub fn new(vessel: Vessel, navigator: Navigator) -> Self {
        let rate = vessel.config().ticks_per_second;
        let track = TrackRecorder::for_rate(*vessel.frame(), rate);
        let mut sim = Self {
            vessel,
            initial_navigator: navigator.clone(),
            navigator,
            track,
            clock: FixedTimestep::from_rate(rate),
            trim: TrimInput::default(),
            ticks: 0,
        };
        sim.track.record(&sim.vessel.state());
        sim
    }

    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self, AppError> {
        scenario.validate()?;

        let start = &scenario.start;
        let vessel = Vessel::with_config(start.lat, start.lon, scenario.vessel.clone())
            .with_heading(start.heading_deg.to_radians());

        // Open-loop thrust must scale by the same top speed the hull reaches
        let navigation = NavigationConfig {
            max_speed_mps: scenario.vessel.max_speed_mps,
            ..scenario.navigation.clone()
        };
        let mut navigator = Navigator::with_config(navigation);
        navigator.set_target_heading_deg(scenario.target_heading_deg);
        navigator.set_target_speed_kts(scenario.target_speed_kts);
        navigator.set_semi_auto_targets(scenario.semi_auto_thrust, scenario.semi_auto_rudder);
        navigator.set_manual_input(scenario.manual);
        for spec in &scenario.waypoints {
            let (lat, lon) = spec.resolve(vessel.frame(), start);
            navigator.add_waypoint(lat, lon);
        }
        navigator.set_mode_by_name(&scenario.mode)?;

        debug!(
            "Scenario `{}`: {} waypoints, {} s",
            scenario.name,
            scenario.waypoints.len(),
            scenario.duration_s
        );
        Ok(Self::new(vessel, navigator))
    }

    /// Runs exactly one fixed tick and returns the commands applied.
    pub fn tick(&mut self) -> ActuatorInput {
        let ctx = self.clock.tick();
        self.step(ctx)
    }

    pub fn run_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Runs as many whole ticks as fit in `wall_dt` seconds, carrying the rest.
    pub fn advance(&mut self, wall_dt: f64) -> usize {
        let due = self.clock.advance(wall_dt);
        for ctx in &due {
            self.step(*ctx);
        }
        due.len()
    }

    fn step(&mut self, ctx: SimContext) -> ActuatorInput {
        if self.navigator.mode() == ControlMode::SemiAuto {
            self.navigator.apply_trim(self.trim);
        }

        let state = self.vessel.state();
        let input = self.navigator.step_control(ctx, &state);
        self.vessel.step_physics(ctx, input);
        self.track.record(&self.vessel.state());
        self.ticks += 1;
        input
    }

    /// Runs `total` ticks, reporting telemetry every `report_every` ticks
    /// and once more at the end.
    pub fn run<F>(&mut self, total: u64, report_every: u64, mut on_report: F) -> Result<(), AppError>
    where
        F: FnMut(&Telemetry) -> Result<(), AppError>,
    {
        let report_every = report_every.max(1);
        let mut route_done = self.navigator.route_complete();

        for _ in 0..total {
            self.tick();
            if self.ticks % report_every == 0 {
                on_report(&self.telemetry())?;
            }
            if !route_done && self.navigator.route_complete() {
                route_done = true;
                info!("Route complete after {:.1} s", self.elapsed());
            }
        }

        if self.ticks % report_every != 0 {
            on_report(&self.telemetry())?;
        }
        Ok(())
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            t: self.elapsed(),
            lat: self.vessel.lat(),
            lon: self.vessel.lon(),
            speed_kts: self.vessel.speed() * MPS_TO_KNOTS,
            heading_deg: self.vessel.heading().to_degrees(),
            thrust: self.vessel.thrust(),
            rudder: self.vessel.rudder(),
            distance_travelled_m: self.track.distance_m(),
            nav: self.navigator.status(),
        }
    }

    pub fn set_trim(&mut self, trim: TrimInput) {
        self.trim = trim;
    }

    /// Back to the start position with an empty track. The controller is
    /// restored to the state it was handed over in (mode, targets, route);
    /// later edits through `navigator_mut` are discarded.
    pub fn reset(&mut self) {
        self.vessel.reset();
        self.navigator = self.initial_navigator.clone();
        self.track.clear();
        self.clock = FixedTimestep::from_rate(self.vessel.config().ticks_per_second);
        self.ticks = 0;
        self.track.record(&self.vessel.state());
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn vessel(&self) -> &Vessel {
        &self.vessel
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn track(&self) -> &TrackRecorder {
        &self.track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use control::ManualInput;

    fn manual_sim() -> Simulation {
        Simulation::new(Vessel::new(50.88, -1.38), Navigator::new())
    }

    #[test]
    fn test_tick_applies_controller_commands() {
        let mut sim = manual_sim();
        sim.navigator_mut().set_manual_input(ManualInput { forward: true, ..Default::default() });

        let cmd = sim.tick();

        assert_eq!(cmd.thrust, 1.0);
        assert_eq!(sim.vessel().thrust(), 1.0);
        assert!(sim.vessel().speed() > 0.0);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_semi_auto_trim_applied_each_tick() {
        let mut sim = manual_sim();
        sim.navigator_mut().set_mode(ControlMode::SemiAuto);
        sim.set_trim(TrimInput { thrust_up: true, ..Default::default() });

        sim.run_ticks(30);

        assert!((sim.navigator().target_thrust() - 0.3).abs() < 1e-9);
        assert!((sim.vessel().thrust() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_trim_ignored_outside_semi_auto() {
        let mut sim = manual_sim();
        sim.set_trim(TrimInput { thrust_up: true, ..Default::default() });
        sim.run_ticks(10);
        assert_eq!(sim.navigator().target_thrust(), 0.0);
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut sim = manual_sim();
        assert_eq!(sim.advance(0.06), 3);
        assert_eq!(sim.ticks(), 3);
        assert!((sim.elapsed() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_run_reports_on_interval_and_at_end() {
        let mut sim = manual_sim();
        let mut reports = Vec::new();
        sim.run(130, 60, |t| {
            reports.push(t.t);
            Ok(())
        })
        .unwrap();
        assert_eq!(reports.len(), 3);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut sim = manual_sim();
        sim.navigator_mut().set_manual_input(ManualInput { forward: true, ..Default::default() });
        sim.run_ticks(120);
        sim.reset();
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.vessel().lat(), 50.88);
        assert_eq!(sim.track().trail_len(), 1);
        assert_eq!(sim.navigator().mode(), ControlMode::Manual);
    }

    #[test]
    fn test_reset_restores_scenario_route() {
        let mut sim = Simulation::from_scenario(&ScenarioConfig::default()).unwrap();
        sim.run_ticks(100);
        sim.navigator_mut().clear_waypoints();
        sim.navigator_mut().set_mode(ControlMode::Manual);

        sim.reset();

        let nav = sim.navigator();
        assert_eq!(nav.mode(), ControlMode::Waypoint);
        assert_eq!(nav.waypoints().len(), 4);
        assert_eq!(nav.current_waypoint_index(), 0);
        assert_eq!(nav.target_speed_kts(), 2.0);
        assert!(sim.tick().thrust > 0.0);
    }
}
