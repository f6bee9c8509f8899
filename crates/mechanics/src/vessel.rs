//! Vessel motion model
//!
//! First-order lag on speed, proportional drag, speed-scaled rudder
//! authority and flat-earth position integration. Gains are per-tick
//! coefficients, so the model always advances by one fixed tick.

use std::f64::consts::TAU;

use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{
    ActuatorInput, FlatEarthEuler, Integrator, LocalFrame, MechanicsModel, Model, SimContext,
    VesselState, DEFAULT_REFERENCE_LAT,
};

/// Physical properties of the vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    /// Speed reached asymptotically at full thrust without drag (m/s).
    pub max_speed_mps: f64,
    /// Fraction of the speed error closed each tick.
    pub acceleration_gain: f64,
    /// Fraction of speed lost each tick.
    pub drag_coefficient: f64,
    /// Heading change per tick at full rudder and full speed (rad).
    pub turn_rate_gain: f64,
    /// Below this speed the rudder has no effect (m/s).
    pub steerage_speed_mps: f64,
    /// Fixed integration rate.
    pub ticks_per_second: u32,
    /// Hull length, for display scaling (m).
    pub length_m: f64,
    /// Latitude at which the longitude scale factor is computed.
    pub reference_lat: f64,
}

impl Default for VesselConfig {
    fn default() -> Self {
        VesselConfig {
            max_speed_mps: 5.14, // ~10 kts
            acceleration_gain: 0.02,
            drag_coefficient: 0.01,
            turn_rate_gain: 0.03,
            steerage_speed_mps: 0.1,
            ticks_per_second: 60,
            length_m: 1.0,
            reference_lat: DEFAULT_REFERENCE_LAT,
        }
    }
}

impl VesselConfig {
    pub fn dt(&self) -> f64 {
        1.0 / self.ticks_per_second.max(1) as f64
    }
}

#[derive(Debug, Clone)]
pub struct Vessel {
    config: VesselConfig,
    state: VesselState,
    start: VesselState,
    thrust: f64,
    rudder: f64,
    integrator: FlatEarthEuler,
}

impl Vessel {
    /// Vessel at rest at the given position, pointing North.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self::with_config(lat, lon, VesselConfig::default())
    }

    pub fn with_config(lat: f64, lon: f64, config: VesselConfig) -> Self {
        let state = VesselState::at(lat, lon);
        let integrator = FlatEarthEuler::new(LocalFrame::new(config.reference_lat));
        Vessel {
            config,
            state,
            start: state,
            thrust: 0.0,
            rudder: 0.0,
            integrator,
        }
    }

    /// Sets the initial heading in radians (navigational convention).
    pub fn with_heading(mut self, heading: f64) -> Self {
        self.state.heading = normalize_heading(heading);
        self.start.heading = self.state.heading;
        self
    }

    /// Applies actuator commands for the next tick. Both are clamped to [-1, 1].
    pub fn set_commands(&mut self, thrust: f64, rudder: f64) {
        let cmd = ActuatorInput::clamped(thrust, rudder);
        self.thrust = cmd.thrust;
        self.rudder = cmd.rudder;
    }

    /// Advances the vessel by one fixed tick.
    pub fn update(&mut self) {
        let max_speed = self.config.max_speed_mps;

        // Speed: first-order lag toward the thrust target, then drag
        let target_speed = self.thrust * max_speed;
        let mut speed = self.state.speed;
        speed += (target_speed - speed) * self.config.acceleration_gain;
        speed *= 1.0 - self.config.drag_coefficient;
        self.state.speed = speed;

        // Heading: no steerage way below the threshold
        if speed.abs() > self.config.steerage_speed_mps && max_speed > 0.0 {
            let turn_effectiveness = self.rudder * (speed.abs() / max_speed);
            self.state.heading -= turn_effectiveness * self.config.turn_rate_gain;
        }
        self.state.heading = normalize_heading(self.state.heading);

        let ctx = SimContext {
            dt: self.config.dt(),
            t: 0.0,
        };
        self.integrator.step(&ctx, &mut self.state);
    }

    pub fn lat(&self) -> f64 {
        self.state.lat
    }

    pub fn lon(&self) -> f64 {
        self.state.lon
    }

    pub fn heading(&self) -> f64 {
        self.state.heading
    }

    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    pub fn thrust(&self) -> f64 {
        self.thrust
    }

    pub fn rudder(&self) -> f64 {
        self.rudder
    }

    pub fn config(&self) -> &VesselConfig {
        &self.config
    }

    pub fn frame(&self) -> &LocalFrame {
        &self.integrator.frame
    }
}

impl Model for Vessel {
    fn reset(&mut self) {
        self.state = self.start;
        self.thrust = 0.0;
        self.rudder = 0.0;
        debug!("Vessel reset to ({:.6}, {:.6})", self.start.lat, self.start.lon);
    }
}

impl MechanicsModel for Vessel {
    fn step_physics(&mut self, _ctx: SimContext, input: ActuatorInput) {
        self.set_commands(input.thrust, input.rudder);
        self.update();
    }

    fn state(&self) -> VesselState {
        self.state
    }
}

/// Wraps a heading into [0, 2π).
pub fn normalize_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
