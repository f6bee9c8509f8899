use serde::{Deserialize, Serialize};

// Kinematic state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselState {
    pub lat: f64,
    pub lon: f64,
    pub heading: f64, // radians, 0 = North, clockwise
    pub speed: f64,   // m/s, negative when going astern
}

impl VesselState {
    pub fn at(lat: f64, lon: f64) -> Self {
        VesselState {
            lat,
            lon,
            heading: 0.0,
            speed: 0.0,
        }
    }
}

// Actuator commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActuatorInput {
    pub thrust: f64,
    pub rudder: f64,
}

impl ActuatorInput {
    pub const IDLE: ActuatorInput = ActuatorInput {
        thrust: 0.0,
        rudder: 0.0,
    };

    /// Builds a command with both channels clamped to [-1, 1].
    /// Non-finite values collapse to 0.
    pub fn clamped(thrust: f64, rudder: f64) -> Self {
        ActuatorInput {
            thrust: sanitize(thrust),
            rudder: sanitize(rudder),
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

pub trait Model {
    fn reset(&mut self);
}

pub trait MechanicsModel: Model {
    fn step_physics(&mut self, ctx: SimContext, input: ActuatorInput);
    fn state(&self) -> VesselState;
}

pub trait ControlModel: Model {
    fn step_control(&mut self, ctx: SimContext, state: &VesselState) -> ActuatorInput;
}
