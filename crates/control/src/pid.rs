//! PID (Proportional-Integral-Derivative) Controller
//!
//! A discrete, per-tick closed-loop controller with integral-zone
//! anti-windup and output saturation.

use serde::{Deserialize, Serialize};

/// Configuration for a PID controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Integral zone: accumulate only while |error| < i_zone, otherwise the
    /// accumulator is zeroed (None = always accumulate)
    pub i_zone: Option<f64>,
    /// Maximum integral accumulator magnitude
    pub i_max: f64,
    /// Minimum output value
    pub output_min: f64,
    /// Maximum output value
    pub output_max: f64,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            i_zone: None,
            i_max: f64::MAX,
            output_min: -1.0,
            output_max: 1.0,
        }
    }
}

impl PidConfig {
    /// Create a P-only controller
    pub fn p(kp: f64) -> Self {
        Self { kp, ..Default::default() }
    }

    /// Create a PI controller
    pub fn pi(kp: f64, ki: f64) -> Self {
        Self { kp, ki, ..Default::default() }
    }

    /// Create a PID controller
    pub fn pid(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, ..Default::default() }
    }

    /// Set output limits
    pub fn with_limits(mut self, min: f64, max: f64) -> Self {
        self.output_min = min;
        self.output_max = max;
        self
    }

    /// Set integral accumulator limit
    pub fn with_i_max(mut self, i_max: f64) -> Self {
        self.i_max = i_max;
        self
    }

    /// Set integral zone
    pub fn with_i_zone(mut self, i_zone: f64) -> Self {
        self.i_zone = Some(i_zone);
        self
    }
}

/// PID Controller with state
#[derive(Debug, Clone)]
pub struct PidController {
    config: PidConfig,
    integral: f64,
    prev_error: Option<f64>,
    setpoint: f64,
}

impl PidController {
    /// Create a new controller with the given configuration
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            prev_error: None,
            setpoint: 0.0,
        }
    }

    /// Set the target setpoint
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
    }

    /// Reset the controller memory (integral and previous error)
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = None;
    }

    /// Update with a new measurement; error is `setpoint - measurement`.
    pub fn update(&mut self, measurement: f64) -> f64 {
        self.update_error(self.setpoint - measurement)
    }

    /// Update with an error computed by the caller (e.g. a wrapped angle).
    pub fn update_error(&mut self, error: f64) -> f64 {
        // Proportional term
        let p_term = self.config.kp * error;

        // Integral term: outside the zone the accumulator is dropped entirely
        let in_i_zone = self.config.i_zone
            .map(|zone| error.abs() < zone)
            .unwrap_or(true);

        if in_i_zone {
            self.integral += error;
            self.integral = self.integral.clamp(-self.config.i_max, self.config.i_max);
        } else {
            self.integral = 0.0;
        }
        let i_term = self.config.ki * self.integral;

        // Derivative term, per tick; none on the first sample after a reset
        let d_term = match self.prev_error {
            Some(prev) => self.config.kd * (error - prev),
            None => 0.0,
        };
        self.prev_error = Some(error);

        let output = p_term + i_term + d_term;
        output.clamp(self.config.output_min, self.config.output_max)
    }

    /// Get the current integral accumulator value
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Error seen on the previous update, if any
    pub fn prev_error(&self) -> Option<f64> {
        self.prev_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p_only_proportional_output() {
        let config = PidConfig::p(0.1);
        let mut ctrl = PidController::new(config);
        ctrl.set_setpoint(10.0);

        // With measurement=4, error=6, P output should be 0.6
        let output = ctrl.update(4.0);
        assert!((output - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_pi_eliminates_steady_state_error() {
        let config = PidConfig::pi(0.5, 0.05).with_limits(-10.0, 10.0);
        let mut ctrl = PidController::new(config);
        ctrl.set_setpoint(10.0);

        // First-order plant with a constant disturbance
        let mut measurement = 0.0;
        for _ in 0..2000 {
            let output = ctrl.update(measurement);
            measurement += 0.2 * (output - measurement * 0.1) - 0.05;
        }

        assert!((measurement - 10.0).abs() < 0.05, "Expected ~10.0, got {}", measurement);
    }

    #[test]
    fn test_output_saturation() {
        let config = PidConfig::p(100.0);
        let mut ctrl = PidController::new(config);
        ctrl.set_setpoint(10.0);

        let output = ctrl.update(0.0);
        assert!((output - 1.0).abs() < 1e-9); // Should be clamped to max

        ctrl.set_setpoint(-10.0);
        let output = ctrl.update(0.0);
        assert!((output - (-1.0)).abs() < 1e-9); // Should be clamped to min
    }

    #[test]
    fn test_anti_windup_zeroes_integral_on_large_error() {
        let config = PidConfig::pid(0.2, 0.05, 0.0).with_i_zone(0.5);
        let mut ctrl = PidController::new(config);

        // A fresh 180 degree change: sustained large error
        for _ in 0..500 {
            ctrl.update_error(std::f64::consts::PI);
            assert_eq!(ctrl.integral(), 0.0);
        }

        // Near-zero error afterwards: no stored integral to overshoot with
        let output = ctrl.update_error(0.01);
        assert!((ctrl.integral() - 0.01).abs() < 1e-12);
        assert!((output - (0.2 * 0.01 + 0.05 * 0.01)).abs() < 1e-12);
    }

    #[test]
    fn test_leaving_i_zone_drops_accumulator() {
        let config = PidConfig::pi(0.0, 1.0).with_i_zone(5.0);
        let mut ctrl = PidController::new(config);

        ctrl.update_error(1.0);
        ctrl.update_error(1.0);
        assert!((ctrl.integral() - 2.0).abs() < 1e-12);

        ctrl.update_error(8.0);
        assert_eq!(ctrl.integral(), 0.0);
    }

    #[test]
    fn test_i_max_clamps_accumulator() {
        let config = PidConfig::pi(0.0, 0.01).with_i_max(3.0);
        let mut ctrl = PidController::new(config);
        for _ in 0..100 {
            ctrl.update_error(1.0);
        }
        assert!((ctrl.integral() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_is_error_difference() {
        let config = PidConfig::pid(0.0, 0.0, 2.0).with_limits(-100.0, 100.0);
        let mut ctrl = PidController::new(config);

        // No previous error yet
        let first = ctrl.update_error(5.0);
        assert!(first.abs() < 1e-12);

        let second = ctrl.update_error(3.0);
        assert!((second - (-4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_state() {
        let config = PidConfig::pid(0.5, 0.1, 1.0);
        let mut ctrl = PidController::new(config.clone());
        ctrl.set_setpoint(1.0);

        // Accumulate some integral
        for _ in 0..10 {
            ctrl.update(0.5);
        }
        assert!(ctrl.integral() > 0.0);

        ctrl.reset();
        assert!((ctrl.integral()).abs() < 1e-9);
        assert_eq!(ctrl.prev_error(), None);

        let mut fresh = PidController::new(config);
        fresh.set_setpoint(1.0);
        assert_eq!(ctrl.update(0.2), fresh.update(0.2));
    }
}
