//! Operator input
//!
//! Held-key state supplied by the driving loop each tick.

use serde::{Deserialize, Serialize};

/// Per-tick change applied to semi-auto targets while a trim key is held.
pub const TRIM_STEP: f64 = 0.01;

/// Directional keys for manual control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualInput {
    pub forward: bool,
    pub reverse: bool,
    pub port: bool,
    pub starboard: bool,
}

impl ManualInput {
    /// Forward wins over reverse and port wins over starboard.
    pub fn commands(&self) -> (f64, f64) {
        let thrust = if self.forward {
            1.0
        } else if self.reverse {
            -0.5
        } else {
            0.0
        };

        let rudder = if self.port {
            1.0
        } else if self.starboard {
            -1.0
        } else {
            0.0
        };

        (thrust, rudder)
    }
}

/// Trim keys for semi-auto targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimInput {
    pub thrust_up: bool,
    pub thrust_down: bool,
    pub rudder_up: bool,
    pub rudder_down: bool,
}

impl TrimInput {
    /// Net `(thrust, rudder)` change for one tick.
    pub fn deltas(&self) -> (f64, f64) {
        let step = |up: bool, down: bool| match (up, down) {
            (true, false) => TRIM_STEP,
            (false, true) => -TRIM_STEP,
            _ => 0.0,
        };
        (
            step(self.thrust_up, self.thrust_down),
            step(self.rudder_up, self.rudder_down),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_idle() {
        assert_eq!(ManualInput::default().commands(), (0.0, 0.0));
    }

    #[test]
    fn test_manual_mapping() {
        let input = ManualInput { forward: true, starboard: true, ..Default::default() };
        assert_eq!(input.commands(), (1.0, -1.0));

        let input = ManualInput { reverse: true, port: true, ..Default::default() };
        assert_eq!(input.commands(), (-0.5, 1.0));
    }

    #[test]
    fn test_manual_forward_takes_priority() {
        let input = ManualInput { forward: true, reverse: true, ..Default::default() };
        assert_eq!(input.commands().0, 1.0);
    }

    #[test]
    fn test_trim_opposing_keys_cancel() {
        let trim = TrimInput { thrust_up: true, thrust_down: true, rudder_down: true, ..Default::default() };
        assert_eq!(trim.deltas(), (0.0, -TRIM_STEP));
    }
}
