//! PID feedback law
//!
//! Discrete PID without an explicit dt term: callers invoke `update`
//! exactly once per scheduler tick, so the tick period is folded into
//! the gains. Gains live outside the controller state and are passed by
//! reference on every call, which makes live tuning visible without
//! re-initialization.
//!
//! There is no anti-windup. The integral sum accumulates on every call;
//! callers reset the controller when (re)entering a profile to avoid
//! carry-over bias.

/// PID gain set
///
/// Owned by the component being tuned, not by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl PidGains {
    /// Proportional-only gain set
    pub const fn p(kp: f32) -> Self {
        Self {
            kp,
            ki: 0.0,
            kd: 0.0,
        }
    }
}

/// Output clamp applied by [`Pid::turn_update`]
const TURN_OUTPUT_LIMIT: f32 = 20.0;

/// PID controller state
///
/// Only the accumulated error history lives here.
#[derive(Debug, Default)]
pub struct Pid {
    error_sum: f32,
    last_error: f32,
}

impl Pid {
    /// Create a controller with zeroed history
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the integral sum and the derivative history
    pub fn reset(&mut self) {
        self.error_sum = 0.0;
        self.last_error = 0.0;
    }

    /// One feedback step, unclamped
    pub fn update(&mut self, gains: &PidGains, setpoint: f32, measured: f32) -> f32 {
        let error = setpoint - measured;
        self.error_sum += error;
        let output =
            gains.kp * error + gains.ki * self.error_sum + gains.kd * (error - self.last_error);
        self.last_error = error;
        output
    }

    /// One feedback step with the output clamped for turn-rate control
    pub fn turn_update(&mut self, gains: &PidGains, setpoint: f32, measured: f32) -> f32 {
        self.update(gains, setpoint, measured)
            .clamp(-TURN_OUTPUT_LIMIT, TURN_OUTPUT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Proportional Tests ==========

    #[test]
    fn test_proportional_only() {
        let gains = PidGains::p(0.5);
        let mut pid = Pid::new();

        let out = pid.update(&gains, 10.0, 4.0);
        assert_eq!(out, 3.0, "got {}", out);
    }

    #[test]
    fn test_zero_error_zero_output() {
        let gains = PidGains {
            kp: 0.5,
            ki: 0.1,
            kd: 0.2,
        };
        let mut pid = Pid::new();

        let out = pid.update(&gains, 5.0, 5.0);
        assert_eq!(out, 0.0, "got {}", out);
    }

    // ========== Integral Tests ==========

    #[test]
    fn test_integral_accumulates() {
        let gains = PidGains {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
        };
        let mut pid = Pid::new();

        assert_eq!(pid.update(&gains, 1.0, 0.0), 1.0);
        assert_eq!(pid.update(&gains, 1.0, 0.0), 2.0);
        assert_eq!(pid.update(&gains, 1.0, 0.0), 3.0);
    }

    #[test]
    fn test_reset_clears_history() {
        let gains = PidGains {
            kp: 0.0,
            ki: 1.0,
            kd: 1.0,
        };
        let mut pid = Pid::new();

        pid.update(&gains, 1.0, 0.0);
        pid.update(&gains, 1.0, 0.0);
        pid.reset();

        // Same output as a fresh controller
        let out = pid.update(&gains, 1.0, 0.0);
        assert_eq!(out, 2.0, "got {}", out);
    }

    // ========== Derivative Tests ==========

    #[test]
    fn test_derivative_on_error_change() {
        let gains = PidGains {
            kp: 0.0,
            ki: 0.0,
            kd: 2.0,
        };
        let mut pid = Pid::new();

        // First call: last_error starts at 0, so d-term sees the full error
        assert_eq!(pid.update(&gains, 3.0, 0.0), 6.0);
        // Error unchanged, d-term vanishes
        assert_eq!(pid.update(&gains, 3.0, 0.0), 0.0);
        // Error shrinks by 2, d-term goes negative
        assert_eq!(pid.update(&gains, 1.0, 0.0), -4.0);
    }

    // ========== Live Tuning Tests ==========

    #[test]
    fn test_gain_change_applies_next_update() {
        let mut gains = PidGains::p(1.0);
        let mut pid = Pid::new();

        assert_eq!(pid.update(&gains, 2.0, 0.0), 2.0);
        gains.kp = 10.0;
        assert_eq!(pid.update(&gains, 2.0, 0.0), 20.0);
    }

    // ========== Turn Update Tests ==========

    #[test]
    fn test_turn_update_clamps_both_ways() {
        let gains = PidGains::p(1.0);
        let mut pid = Pid::new();
        assert_eq!(pid.turn_update(&gains, 500.0, 0.0), 20.0);

        pid.reset();
        assert_eq!(pid.turn_update(&gains, -500.0, 0.0), -20.0);
    }

    #[test]
    fn test_turn_update_passes_small_output() {
        let gains = PidGains::p(0.05);
        let mut pid = Pid::new();
        let out = pid.turn_update(&gains, 90.0, 0.0);
        assert!((out - 4.5).abs() < 1e-6, "got {}", out);
    }
}
