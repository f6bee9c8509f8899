//! Shared simulation types for the vessel simulator
//!
//! This crate provides:
//! - The vessel kinematic state and actuator command types
//! - Model traits implemented by the motion model and the controller
//! - The local flat-earth frame and fixed-timestep integration

pub mod frame;
pub mod integrators;
pub mod traits;

pub use frame::*;
pub use integrators::*;
pub use traits::*;

/// Knots to meters per second.
pub const KNOTS_TO_MPS: f64 = 0.514444;
/// Meters per second to knots.
pub const MPS_TO_KNOTS: f64 = 1.94384;
