//! Headless driver for the vessel simulator
//!
//! Wires the motion model, the navigation controller and the track
//! recorder into the fixed-rate tick loop, and loads scenarios from JSON.

pub mod error;
pub mod scenario;
pub mod simulation;

pub use error::AppError;
pub use scenario::{ScenarioConfig, StartPosition, WaypointSpec};
pub use simulation::{Simulation, Telemetry};
