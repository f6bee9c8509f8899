//! Navigation controller
//!
//! Converts navigation state (position, heading, speed) into thrust and
//! rudder commands under one of four control modes. Positive rudder turns
//! to port (heading decreases), matching the motion model.

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use simcore::{ActuatorInput, ControlModel, KNOTS_TO_MPS, Model, SimContext, VesselState};

use crate::error::NavError;
use crate::geo::{self, wrap_angle, wrap_two_pi};
use crate::input::{ManualInput, TrimInput};
use crate::mode::ControlMode;
use crate::pid::{PidConfig, PidController};

/// Lower bound for the cross-track correction denominator.
const XTE_DENOMINATOR_FLOOR: f64 = 1e-3;

/// How target speed is turned into a thrust command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedControl {
    /// Speed PID closing the loop on measured speed
    #[default]
    ClosedLoop,
    /// Fixed mapping `target / max_speed`
    OpenLoop,
}

/// Tuning for the navigation controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Heading loop, error in radians, output is rudder
    pub heading_pid: PidConfig,
    /// Speed loop, error in m/s, output is thrust
    pub speed_pid: PidConfig,
    /// Distance at which a waypoint counts as reached (m)
    pub arrival_radius_m: f64,
    /// Heading error above which hard rudder is applied (deg)
    pub hard_turn_deg: f64,
    /// Heading error above which normal rudder is applied (deg)
    pub normal_turn_deg: f64,
    pub hard_rudder: f64,
    pub normal_rudder: f64,
    /// Distance from the waypoint where approach slowdown starts (m)
    pub approach_distance_m: f64,
    /// Slowest approach speed as a fraction of the target speed
    pub min_approach_fraction: f64,
    pub speed_control: SpeedControl,
    /// Used by the open-loop thrust mapping (m/s). Scenario runs copy the
    /// vessel's own top speed in here.
    pub max_speed_mps: f64,
    pub xte_gain: f64,
    /// Look-ahead time that sets the correction distance (s)
    pub xte_lookahead_s: f64,
    pub max_xte_correction_deg: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            heading_pid: PidConfig::pid(1.5, 0.0002, 2.0).with_i_zone(10f64.to_radians()),
            speed_pid: PidConfig::pid(0.8, 0.01, 0.0).with_i_zone(1.0),
            arrival_radius_m: 5.0,
            hard_turn_deg: 90.0,
            normal_turn_deg: 20.0,
            hard_rudder: 1.0,
            normal_rudder: 0.5,
            approach_distance_m: 50.0,
            min_approach_fraction: 0.2,
            speed_control: SpeedControl::ClosedLoop,
            max_speed_mps: 5.14,
            xte_gain: 1.0,
            xte_lookahead_s: 5.0,
            max_xte_correction_deg: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Controller state exposed for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavStatus {
    pub mode: ControlMode,
    /// Index of the waypoint being steered to; None when idle or complete
    pub active_waypoint: Option<usize>,
    pub waypoint_count: usize,
    pub cross_track_error_m: f64,
    pub distance_to_waypoint_m: Option<f64>,
    pub target_heading_deg: f64,
    pub target_speed_kts: f64,
    pub target_thrust: f64,
    pub target_rudder: f64,
}

#[derive(Clone)]
pub struct Navigator {
    config: NavigationConfig,
    mode: ControlMode,
    target_heading_deg: f64,
    target_speed_kts: f64,
    target_thrust: f64,
    target_rudder: f64,
    manual: ManualInput,
    waypoints: Vec<Waypoint>,
    current_waypoint_index: usize,
    cross_track_error_m: f64,
    distance_to_waypoint_m: Option<f64>,
    heading_pid: PidController,
    speed_pid: PidController,
}

impl Navigator {
    pub fn new() -> Self {
        Self::with_config(NavigationConfig::default())
    }

    pub fn with_config(config: NavigationConfig) -> Self {
        Self {
            heading_pid: PidController::new(config.heading_pid.clone()),
            speed_pid: PidController::new(config.speed_pid.clone()),
            config,
            mode: ControlMode::Manual,
            target_heading_deg: 90.0,
            target_speed_kts: 0.0,
            target_thrust: 0.0,
            target_rudder: 0.0,
            manual: ManualInput::default(),
            waypoints: Vec::new(),
            current_waypoint_index: 0,
            cross_track_error_m: 0.0,
            distance_to_waypoint_m: None,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Switches mode. Feedback memory is cleared on every call; the waypoint
    /// cursor is kept so a route resumes where it left off.
    pub fn set_mode(&mut self, mode: ControlMode) {
        self.reset_controllers();
        if mode != self.mode {
            info!("Controller mode: {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        if !matches!(mode, ControlMode::Waypoint) {
            self.cross_track_error_m = 0.0;
            self.distance_to_waypoint_m = None;
        }
    }

    /// Switches mode by UI tag. Unknown tags leave the current mode in place.
    pub fn set_mode_by_name(&mut self, name: &str) -> Result<ControlMode, NavError> {
        match name.parse::<ControlMode>() {
            Ok(mode) => {
                self.set_mode(mode);
                Ok(mode)
            }
            Err(err) => {
                warn!("Rejected mode change: {err}; staying in {}", self.mode);
                Err(err)
            }
        }
    }

    pub fn reset_controllers(&mut self) {
        self.heading_pid.reset();
        self.speed_pid.reset();
    }

    pub fn target_heading_deg(&self) -> f64 {
        self.target_heading_deg
    }

    pub fn set_target_heading_deg(&mut self, degrees: f64) {
        self.target_heading_deg = degrees.rem_euclid(360.0);
    }

    pub fn target_speed_kts(&self) -> f64 {
        self.target_speed_kts
    }

    pub fn set_target_speed_kts(&mut self, knots: f64) {
        self.target_speed_kts = knots;
    }

    pub fn target_thrust(&self) -> f64 {
        self.target_thrust
    }

    pub fn target_rudder(&self) -> f64 {
        self.target_rudder
    }

    pub fn set_semi_auto_targets(&mut self, thrust: f64, rudder: f64) {
        let cmd = ActuatorInput::clamped(thrust, rudder);
        self.target_thrust = cmd.thrust;
        self.target_rudder = cmd.rudder;
    }

    /// Nudges the semi-auto targets by one trim step per held key.
    pub fn apply_trim(&mut self, trim: TrimInput) {
        let (d_thrust, d_rudder) = trim.deltas();
        self.set_semi_auto_targets(self.target_thrust + d_thrust, self.target_rudder + d_rudder);
    }

    pub fn set_manual_input(&mut self, input: ManualInput) {
        self.manual = input;
    }

    pub fn add_waypoint(&mut self, lat: f64, lon: f64) {
        self.waypoints.push(Waypoint::new(lat, lon));
        debug!("Waypoint {} added at ({lat:.6}, {lon:.6})", self.waypoints.len());
    }

    /// Drops the most recently added waypoint, pulling the cursor back
    /// inside the list if it pointed past the new end.
    pub fn remove_last_waypoint(&mut self) -> Option<Waypoint> {
        let removed = self.waypoints.pop()?;
        debug!("Waypoint {} removed", self.waypoints.len() + 1);

        let max_index = self.waypoints.len().saturating_sub(1);
        if self.current_waypoint_index > max_index {
            warn!(
                "Waypoint cursor clamped from {} to {}",
                self.current_waypoint_index, max_index
            );
            self.current_waypoint_index = max_index;
        }
        Some(removed)
    }

    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
        self.current_waypoint_index = 0;
        self.cross_track_error_m = 0.0;
        self.distance_to_waypoint_m = None;
        info!("Waypoints cleared");
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn current_waypoint_index(&self) -> usize {
        self.current_waypoint_index
    }

    pub fn active_waypoint(&self) -> Option<Waypoint> {
        self.waypoints.get(self.current_waypoint_index).copied()
    }

    /// True once every waypoint has been reached.
    pub fn route_complete(&self) -> bool {
        !self.waypoints.is_empty() && self.current_waypoint_index >= self.waypoints.len()
    }

    pub fn cross_track_error_m(&self) -> f64 {
        self.cross_track_error_m
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn status(&self) -> NavStatus {
        let active_waypoint = match self.mode {
            ControlMode::Waypoint if self.current_waypoint_index < self.waypoints.len() => {
                Some(self.current_waypoint_index)
            }
            _ => None,
        };
        NavStatus {
            mode: self.mode,
            active_waypoint,
            waypoint_count: self.waypoints.len(),
            cross_track_error_m: self.cross_track_error_m,
            distance_to_waypoint_m: self.distance_to_waypoint_m,
            target_heading_deg: self.target_heading_deg,
            target_speed_kts: self.target_speed_kts,
            target_thrust: self.target_thrust,
            target_rudder: self.target_rudder,
        }
    }

    /// Per-tick entry point. Heading in radians (0 = North), speed in m/s.
    pub fn update(&mut self, lat: f64, lon: f64, heading: f64, speed: f64) -> ActuatorInput {
        let cmd = match self.mode {
            ControlMode::Manual => {
                self.clear_leg_state();
                let (thrust, rudder) = self.manual.commands();
                ActuatorInput::clamped(thrust, rudder)
            }
            ControlMode::SemiAuto => {
                self.clear_leg_state();
                ActuatorInput::clamped(self.target_thrust, self.target_rudder)
            }
            ControlMode::Autohelm => {
                self.clear_leg_state();
                let target = self.target_heading_deg.to_radians();
                let rudder = self.pid_rudder(target, heading);
                let thrust = self.thrust_for(self.target_speed_kts * KNOTS_TO_MPS, speed);
                ActuatorInput::clamped(thrust, rudder)
            }
            ControlMode::Waypoint => self.follow_route(lat, lon, heading, speed),
        };

        trace!(
            "{} thrust={:.3} rudder={:.3} xte={:.2}",
            self.mode, cmd.thrust, cmd.rudder, self.cross_track_error_m
        );
        cmd
    }

    fn follow_route(&mut self, lat: f64, lon: f64, heading: f64, speed: f64) -> ActuatorInput {
        let Some(active) = self.active_waypoint() else {
            return self.hold();
        };

        // Only the active waypoint is checked, so at most one advance per tick
        if geo::distance(lat, lon, active.lat, active.lon) < self.config.arrival_radius_m {
            info!("Arrived at waypoint {}", self.current_waypoint_index + 1);
            self.current_waypoint_index += 1;
            if self.current_waypoint_index >= self.waypoints.len() {
                info!("Route complete, holding");
                return self.hold();
            }
            info!("Advancing to waypoint {}", self.current_waypoint_index + 1);
        }

        let index = self.current_waypoint_index;
        let target = self.waypoints[index];
        let leg_start = match index {
            0 => Waypoint::new(lat, lon),
            _ => self.waypoints[index - 1],
        };

        let distance = geo::distance(lat, lon, target.lat, target.lon);
        let xte = geo::cross_track_error(
            leg_start.lat,
            leg_start.lon,
            target.lat,
            target.lon,
            lat,
            lon,
        );
        self.cross_track_error_m = xte;
        self.distance_to_waypoint_m = Some(distance);

        let bearing = geo::bearing(lat, lon, target.lat, target.lon);
        let course = wrap_two_pi(bearing + self.xte_correction(xte, speed));
        let rudder = self.tiered_rudder(course, heading);

        let target_speed = self.approach_speed(distance);
        let thrust = self.thrust_for(target_speed, speed);

        ActuatorInput::clamped(thrust, rudder)
    }

    fn hold(&mut self) -> ActuatorInput {
        self.clear_leg_state();
        ActuatorInput::IDLE
    }

    fn clear_leg_state(&mut self) {
        self.cross_track_error_m = 0.0;
        self.distance_to_waypoint_m = None;
    }

    /// Course adjustment (rad) steering back toward the track line.
    fn xte_correction(&self, xte: f64, speed: f64) -> f64 {
        if xte == 0.0 {
            return 0.0;
        }
        let denominator = (speed.abs() * self.config.xte_lookahead_s).max(XTE_DENOMINATOR_FLOOR);
        let limit = self.config.max_xte_correction_deg.to_radians();
        (-(self.config.xte_gain * xte / denominator).atan()).clamp(-limit, limit)
    }

    /// Hard and normal bands bypass the PID; only small errors reach it.
    fn tiered_rudder(&mut self, course: f64, heading: f64) -> f64 {
        let error = wrap_angle(course - heading);
        let error_deg = error.to_degrees().abs();

        if error_deg > self.config.hard_turn_deg {
            self.heading_pid.reset();
            -error.signum() * self.config.hard_rudder
        } else if error_deg > self.config.normal_turn_deg {
            self.heading_pid.reset();
            -error.signum() * self.config.normal_rudder
        } else {
            self.pid_rudder(course, heading)
        }
    }

    fn pid_rudder(&mut self, course: f64, heading: f64) -> f64 {
        self.heading_pid.set_setpoint(course);
        let error = wrap_angle(course - heading);
        // Positive error needs the heading to increase, i.e. starboard rudder
        -self.heading_pid.update_error(error)
    }

    fn approach_speed(&self, distance: f64) -> f64 {
        let nominal = self.target_speed_kts * KNOTS_TO_MPS;
        let approach = self.config.approach_distance_m;
        if approach > 0.0 && distance < approach {
            nominal * (distance / approach).max(self.config.min_approach_fraction)
        } else {
            nominal
        }
    }

    fn thrust_for(&mut self, target_mps: f64, speed: f64) -> f64 {
        match self.config.speed_control {
            SpeedControl::ClosedLoop => {
                self.speed_pid.set_setpoint(target_mps);
                self.speed_pid.update(speed)
            }
            SpeedControl::OpenLoop if self.config.max_speed_mps > 0.0 => {
                target_mps / self.config.max_speed_mps
            }
            SpeedControl::OpenLoop => 0.0,
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for Navigator {
    fn reset(&mut self) {
        *self = Navigator::with_config(self.config.clone());
    }
}

impl ControlModel for Navigator {
    fn step_control(&mut self, _ctx: SimContext, state: &VesselState) -> ActuatorInput {
        self.update(state.lat, state.lon, state.heading, state.speed)
    }
}
