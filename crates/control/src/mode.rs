//! Control modes
//!
//! The four mutually exclusive ways the navigator produces actuator commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NavError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMode {
    /// Raw directional input passed straight through
    #[default]
    Manual,
    /// Hold a fixed heading and speed
    Autohelm,
    /// Follow the waypoint route
    Waypoint,
    /// Direct thrust/rudder targets, trimmed incrementally
    SemiAuto,
}

impl ControlMode {
    pub const ALL: [ControlMode; 4] = [
        ControlMode::Manual,
        ControlMode::Autohelm,
        ControlMode::Waypoint,
        ControlMode::SemiAuto,
    ];

    /// Tag used by the UI for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Manual => "MANUAL",
            ControlMode::Autohelm => "AUTOHELM",
            ControlMode::Waypoint => "WAYPOINT",
            ControlMode::SemiAuto => "SEMI_AUTO",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlMode {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_uppercase().replace('-', "_");
        ControlMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == tag)
            .ok_or_else(|| NavError::UnknownMode(s.to_string()))
    }
}
