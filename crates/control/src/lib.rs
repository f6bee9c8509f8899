//! Navigation control for the vessel simulator
//!
//! This crate provides:
//! - PID controllers with integral-zone anti-windup
//! - Geodesic helpers (haversine distance, bearing, angle wrapping, cross-track error)
//! - The mode-switching navigation controller

pub mod error;
pub mod geo;
pub mod input;
pub mod mode;
pub mod navigator;
pub mod pid;

pub use error::*;
pub use input::*;
pub use mode::*;
pub use navigator::*;
pub use pid::*;
