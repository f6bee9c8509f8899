//! Scenario configuration
//!
//! A scenario describes one simulation run: where the vessel starts, how it
//! is tuned, which mode the controller is in and what route it follows.
//! Every field has a default so a JSON file only needs the overrides.

use std::fs;
use std::path::Path;

use control::{ManualInput, NavigationConfig};
use log::LevelFilter;
use mechanics::VesselConfig;
use serde::{Deserialize, Serialize};
use simcore::LocalFrame;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartPosition {
    pub lat: f64,
    pub lon: f64,
    pub heading_deg: f64,
}

impl Default for StartPosition {
    fn default() -> Self {
        Self {
            lat: 50.88,
            lon: -1.38,
            heading_deg: 0.0,
        }
    }
}

/// A waypoint either in absolute coordinates or as meters from the start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaypointSpec {
    Absolute { lat: f64, lon: f64 },
    Offset { north_m: f64, east_m: f64 },
}

impl WaypointSpec {
    pub fn resolve(&self, frame: &LocalFrame, start: &StartPosition) -> (f64, f64) {
        match *self {
            WaypointSpec::Absolute { lat, lon } => (lat, lon),
            WaypointSpec::Offset { north_m, east_m } => {
                frame.offset(start.lat, start.lon, north_m, east_m)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,
    pub start: StartPosition,
    pub vessel: VesselConfig,
    pub navigation: NavigationConfig,
    /// Mode tag as used by the UI (MANUAL, AUTOHELM, WAYPOINT, SEMI_AUTO)
    pub mode: String,
    pub target_heading_deg: f64,
    pub target_speed_kts: f64,
    pub semi_auto_thrust: f64,
    pub semi_auto_rudder: f64,
    pub manual: ManualInput,
    pub waypoints: Vec<WaypointSpec>,
    pub duration_s: f64,
    pub report_interval_s: f64,
    pub log_level: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        // A 100 m box run anticlockwise from the start
        Self {
            name: "box".to_string(),
            start: StartPosition {
                heading_deg: 90.0,
                ..StartPosition::default()
            },
            vessel: VesselConfig::default(),
            navigation: NavigationConfig::default(),
            mode: "WAYPOINT".to_string(),
            target_heading_deg: 90.0,
            target_speed_kts: 2.0,
            semi_auto_thrust: 0.0,
            semi_auto_rudder: 0.0,
            manual: ManualInput::default(),
            waypoints: vec![
                WaypointSpec::Offset { north_m: 0.0, east_m: 100.0 },
                WaypointSpec::Offset { north_m: 100.0, east_m: 100.0 },
                WaypointSpec::Offset { north_m: 100.0, east_m: 0.0 },
                WaypointSpec::Offset { north_m: 0.0, east_m: 0.0 },
            ],
            duration_s: 900.0,
            report_interval_s: 10.0,
            log_level: "info".to_string(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let scenario: ScenarioConfig = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let invalid = |msg: &str| Err(AppError::InvalidScenario(msg.to_string()));

        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return invalid("duration_s must be positive");
        }
        if !(self.report_interval_s.is_finite() && self.report_interval_s > 0.0) {
            return invalid("report_interval_s must be positive");
        }
        if !(self.start.lat.is_finite() && self.start.lon.is_finite()) {
            return invalid("start position must be finite");
        }
        if self.start.lat.abs() > 90.0 {
            return invalid("start latitude out of range");
        }
        if self.vessel.ticks_per_second == 0 {
            return invalid("ticks_per_second must be non-zero");
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, AppError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| AppError::InvalidScenario(format!("unknown log level `{}`", self.log_level)))
    }

    pub fn total_ticks(&self) -> u64 {
        (self.duration_s * self.vessel.ticks_per_second as f64).round() as u64
    }

    pub fn report_every_ticks(&self) -> u64 {
        ((self.report_interval_s * self.vessel.ticks_per_second as f64).round() as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        let scenario = ScenarioConfig::default();
        assert!(scenario.validate().is_ok());
        assert_eq!(scenario.total_ticks(), 54_000);
        assert_eq!(scenario.report_every_ticks(), 600);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let scenario = ScenarioConfig::from_json(r#"{ "mode": "AUTOHELM", "duration_s": 10 }"#).unwrap();
        assert_eq!(scenario.mode, "AUTOHELM");
        assert_eq!(scenario.vessel.ticks_per_second, 60);
        assert_eq!(scenario.navigation.arrival_radius_m, 5.0);
        assert_eq!(scenario.total_ticks(), 600);
    }

    #[test]
    fn test_waypoint_forms() {
        let scenario = ScenarioConfig::from_json(
            r#"{ "waypoints": [ { "lat": 50.9, "lon": -1.4 }, { "north_m": 10.0, "east_m": -5.0 } ] }"#,
        )
        .unwrap();
        assert_eq!(scenario.waypoints[0], WaypointSpec::Absolute { lat: 50.9, lon: -1.4 });

        let frame = LocalFrame::default();
        let (lat, lon) = scenario.waypoints[1].resolve(&frame, &scenario.start);
        let local = frame.to_local(scenario.start.lat, scenario.start.lon, lat, lon);
        assert_relative_eq!(local[0], 10.0, epsilon = 1e-6);
        assert_relative_eq!(local[1], -5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let err = ScenarioConfig::from_json(r#"{ "duration_s": 0 }"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidScenario(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err = ScenarioConfig::from_json(r#"{ "log_level": "chatty" }"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidScenario(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = ScenarioConfig::from_json("{ duration_s: ").unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ScenarioConfig::from_path("/nonexistent/scenario.json").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
